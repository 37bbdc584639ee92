//! Distributed queue commands.
//!
//! A queue lives on a single partition, chosen by its name, so every
//! request is routed with the serialized queue name as the key.

use std::future::Future;
use std::pin::Pin;

use clc_plug::output::{NAME_VALUE, NAME_VALUE_TYPE};
use clc_plug::{Column, Command, Declaration, Error, ExecContext, Result, Row};
use clc_proto::codec::queue::{
    decode_queue_offer_response, decode_queue_poll_response, encode_queue_offer_request,
    encode_queue_poll_request,
};
use clc_proto::{Data, Value, serialization};
use tracing::debug;

use super::{FLAG_NAME, FLAG_SHOW_TYPE, GROUP_DDS, make_data};

const FLAG_VALUE_TYPE: &str = "value-type";
const FLAG_COUNT: &str = "count";

/// `queue`: carries the shared `--name` and `--show-type` flags.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueueGroup;

impl Command for QueueGroup {
    fn init(&self, decl: &mut Declaration) -> Result<()> {
        decl.set_command_group(GROUP_DDS)
            .add_string_flag(FLAG_NAME, Some('n'), "default", false, "queue name")
            .add_bool_flag(FLAG_SHOW_TYPE, None, "add the type names to the output")
            .set_command_help("Queue operations", "Queue operations");
        Ok(())
    }

    fn exec<'a>(
        &'a self,
        _ec: &'a ExecContext,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async { Ok(()) })
    }
}

fn partition_key(name: &str) -> Result<Data> {
    Ok(serialization::encode(&Value::String(name.to_string()))?)
}

/// `queue:offer VALUE...`: add values to the tail of the queue.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueueOfferCommand;

impl Command for QueueOfferCommand {
    fn init(&self, decl: &mut Declaration) -> Result<()> {
        decl.set_positional_arg_count(1, usize::MAX)
            .add_string_flag(
                FLAG_VALUE_TYPE,
                Some('t'),
                "string",
                false,
                "value type: string, bool, int8, int16, int32, int64, float32, float64 or json",
            )
            .set_command_usage("clc queue offer [OPTIONS] VALUE [VALUE...]")
            .set_command_help("Add values to the given queue", "Add values to a queue");
        Ok(())
    }

    fn exec<'a>(
        &'a self,
        ec: &'a ExecContext,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let name = ec.props().get_string(FLAG_NAME);
            let value_type = ec.props().get_string(FLAG_VALUE_TYPE);
            // Parse everything up front so a bad value sends nothing.
            let values = ec
                .args()
                .iter()
                .map(|text| make_data(value_type, text))
                .collect::<Result<Vec<_>>>()?;
            let key = partition_key(name)?;
            let gateway = ec.gateway()?;

            let total = values.len();
            let key_ref = &key;
            ec.execute_blocking(&format!("Offering to queue {name}"), move |_, status| {
                async move {
                    for (i, value) in values.iter().enumerate() {
                        status.set_text(format!("Offering to queue {name} ({}/{total})", i + 1));
                        let request = encode_queue_offer_request(name, value, 0);
                        let response = gateway.invoke_on_key(request, key_ref).await?;
                        if !decode_queue_offer_response(&response)? {
                            return Err(Error::Invocation(format!(
                                "queue '{name}' rejected the item"
                            )));
                        }
                    }
                    Ok::<_, Error>(())
                }
            })
            .await?;
            debug!(queue = name, count = total, "values offered");
            Ok(())
        })
    }
}

/// `queue:poll`: take values from the head of the queue.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueuePollCommand;

impl Command for QueuePollCommand {
    fn init(&self, decl: &mut Declaration) -> Result<()> {
        decl.set_positional_arg_count(0, 0)
            .add_int_flag(FLAG_COUNT, Some('c'), 1, false, "number of values to take")
            .set_command_help(
                "Take values from the given queue. Stops early when the queue is empty",
                "Take values from a queue",
            );
        Ok(())
    }

    fn exec<'a>(
        &'a self,
        ec: &'a ExecContext,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let name = ec.props().get_string(FLAG_NAME);
            let show_type = ec.props().get_bool(FLAG_SHOW_TYPE);
            let count = ec.props().get_int(FLAG_COUNT).unwrap_or(1);
            if count < 1 {
                return Err(Error::InvalidArgument(format!(
                    "--{FLAG_COUNT} must be at least 1, got {count}"
                )));
            }
            let key = partition_key(name)?;
            let gateway = ec.gateway()?;

            let key_ref = &key;
            let items = ec
                .execute_blocking(&format!("Polling queue {name}"), move |_, status| {
                    async move {
                        let mut items = Vec::new();
                        for i in 0..count {
                            status.set_text(format!("Polling queue {name} ({}/{count})", i + 1));
                            let request = encode_queue_poll_request(name, 0);
                            let response = gateway.invoke_on_key(request, key_ref).await?;
                            match decode_queue_poll_response(&response)? {
                                Some(item) => items.push(item),
                                None => break,
                            }
                        }
                        Ok::<_, Error>(items)
                    }
                })
                .await?;

            debug!(queue = name, taken = items.len(), "queue polled");
            let rows: Vec<Row> = items
                .iter()
                .map(|data| {
                    let ty = data.value_type();
                    let mut row = vec![Column::new(NAME_VALUE, ty, gateway.decode_value(name, data))];
                    if show_type {
                        row.push(Column::type_name(NAME_VALUE_TYPE, ty));
                    }
                    row
                })
                .collect();
            ec.add_output_rows(rows);
            Ok(())
        })
    }
}
