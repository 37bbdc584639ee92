//! Requests sent to every member, with the replies merged by the caller.

mod helpers;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use clc_plug::InvocationGateway;
use clc_proto::codec::map::{
    MAP_ENTRY_SET_REQUEST, decode_map_entry_set_response, encode_map_entry_set_request,
};
use clc_proto::{ClientMessage, Data, Value};
use helpers::{Call, FakeCluster, Target, data};

/// A cluster of independent members, each owning part of the data.
struct Members(Vec<Arc<FakeCluster>>);

impl InvocationGateway for Members {
    fn invoke_on_key<'a>(
        &'a self,
        request: ClientMessage,
        key: &'a Data,
    ) -> Pin<Box<dyn Future<Output = clc_plug::Result<ClientMessage>> + Send + 'a>> {
        self.0[0].invoke_on_key(request, key)
    }

    fn invoke_on_random_target<'a>(
        &'a self,
        request: ClientMessage,
    ) -> Pin<Box<dyn Future<Output = clc_plug::Result<ClientMessage>> + Send + 'a>> {
        self.0[0].invoke_on_random_target(request)
    }

    fn invoke_on_all_members<'a>(
        &'a self,
        request: ClientMessage,
    ) -> Pin<Box<dyn Future<Output = clc_plug::Result<Vec<ClientMessage>>> + Send + 'a>>
    {
        Box::pin(async move {
            let mut replies = Vec::with_capacity(self.0.len());
            for member in &self.0 {
                replies.extend(member.invoke_on_all_members(request.clone()).await?);
            }
            Ok(replies)
        })
    }
}

async fn merged_entries(gateway: &dyn InvocationGateway, map: &str) -> Vec<(Value, Value)> {
    let replies = gateway
        .invoke_on_all_members(encode_map_entry_set_request(map))
        .await
        .expect("every member answers");
    let mut entries = Vec::new();
    for reply in &replies {
        for (key_data, value_data) in decode_map_entry_set_response(reply).expect("entry set reply") {
            let key = gateway.decode_value("<key>", &key_data);
            let value = gateway.decode_value(&key.to_string(), &value_data);
            entries.push((key, value));
        }
    }
    entries.sort_by_key(|(key, _)| key.to_string());
    entries
}

#[tokio::test]
async fn entry_set_fans_out_and_merges_member_replies() {
    let first = FakeCluster::new();
    let second = FakeCluster::new();
    let third = FakeCluster::new();
    first.put("stock", &Value::from("apples"), data(&Value::Int32(3)));
    second.put("stock", &Value::from("pears"), data(&Value::Int32(5)));
    second.put("stock", &Value::from("figs"), data(&Value::Int32(1)));
    let members = Members(vec![first.clone(), second.clone(), third.clone()]);

    let entries = merged_entries(&members, "stock").await;

    assert_eq!(
        entries,
        vec![
            (Value::from("apples"), Value::Int32(3)),
            (Value::from("figs"), Value::Int32(1)),
            (Value::from("pears"), Value::Int32(5)),
        ]
    );
    for member in [&first, &second, &third] {
        assert_eq!(
            member.calls(),
            vec![Call {
                target: Target::All,
                message_type: MAP_ENTRY_SET_REQUEST,
            }]
        );
    }
}

#[tokio::test]
async fn fan_out_of_an_unknown_map_merges_to_nothing() {
    let members = Members(vec![FakeCluster::new(), FakeCluster::new()]);

    let entries = merged_entries(&members, "missing").await;

    assert!(entries.is_empty());
}
