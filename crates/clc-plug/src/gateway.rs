//! Cluster invocation abstraction.
//!
//! The cluster client (connection management, partition routing, retries)
//! lives behind [`InvocationGateway`]. Commands encode a request with a
//! `clc_proto::codec` encoder, pick a target, and decode the reply.

use std::future::Future;
use std::pin::Pin;

use clc_proto::{ClientMessage, Data, ProtoError, Value, serialization};
use tracing::info;

use crate::error::Result;

/// Sends encoded requests to cluster members.
pub trait InvocationGateway: Send + Sync {
    /// Send `request` to the member owning `key`'s partition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invocation`](crate::Error::Invocation) on transport
    /// failure.
    fn invoke_on_key<'a>(
        &'a self,
        request: ClientMessage,
        key: &'a Data,
    ) -> Pin<Box<dyn Future<Output = Result<ClientMessage>> + Send + 'a>>;

    /// Send `request` to any one member.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invocation`](crate::Error::Invocation) on transport
    /// failure.
    fn invoke_on_random_target<'a>(
        &'a self,
        request: ClientMessage,
    ) -> Pin<Box<dyn Future<Output = Result<ClientMessage>> + Send + 'a>>;

    /// Send `request` to every member. The caller merges the replies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invocation`](crate::Error::Invocation) if any member
    /// fails.
    fn invoke_on_all_members<'a>(
        &'a self,
        request: ClientMessage,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ClientMessage>>> + Send + 'a>>;

    /// Interpret a value blob. Implementations with extra serializers
    /// override this; the default handles the built-in types.
    ///
    /// # Errors
    ///
    /// Returns the codec error when the bytes cannot be interpreted.
    fn decode_data(&self, data: &Data) -> std::result::Result<Value, ProtoError> {
        serialization::decode(data)
    }

    /// Decode a value, degrading to the undecodable placeholder.
    ///
    /// Never fails: an uninterpretable value logs one diagnostic naming
    /// `key` and the declared type, and comes back as
    /// [`Value::Undecodable`].
    fn decode_value(&self, key: &str, data: &Data) -> Value {
        match self.decode_data(data) {
            Ok(value) => value,
            Err(error) => {
                let type_name = data.value_type().name();
                info!(key, value_type = %type_name, %error, "value could not be decoded");
                Value::undecodable(type_name)
            }
        }
    }
}
