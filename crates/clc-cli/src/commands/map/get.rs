use std::future::Future;
use std::pin::Pin;

use clc_plug::output::{NAME_VALUE, NAME_VALUE_TYPE};
use clc_plug::{Column, Command, Declaration, ExecContext, Result};
use clc_proto::codec::map::{decode_map_get_response, encode_map_get_request};
use tracing::debug;

use crate::commands::{FLAG_NAME, FLAG_SHOW_TYPE, make_data};

const ARG_KEY: &str = "key";
const FLAG_KEY_TYPE: &str = "key-type";

/// `map:get KEY`: fetch one value, routed to the key's partition owner.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapGetCommand;

impl Command for MapGetCommand {
    fn init(&self, decl: &mut Declaration) -> Result<()> {
        decl.add_string_arg(ARG_KEY, "KEY")
            .add_string_flag(
                FLAG_KEY_TYPE,
                Some('k'),
                "string",
                false,
                "key type: string, bool, int8, int16, int32, int64, float32, float64 or json",
            )
            .set_command_help("Get a value from the given map", "Get a value from a map");
        Ok(())
    }

    fn exec<'a>(
        &'a self,
        ec: &'a ExecContext,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let name = ec.props().get_string(FLAG_NAME);
            let key = ec.required_arg(ARG_KEY)?;
            let key_data = make_data(ec.props().get_string(FLAG_KEY_TYPE), key)?;
            let gateway = ec.gateway()?;

            let request = encode_map_get_request(name, &key_data, 0);
            let key_ref = &key_data;
            let response = ec
                .execute_blocking(&format!("Getting from map {name}"), move |_, _| async move {
                    gateway.invoke_on_key(request, key_ref).await
                })
                .await?;

            let data = decode_map_get_response(&response)?;
            let ty = data.value_type();
            debug!(map = name, key, value_type = %ty, "map get answered");
            let mut row = vec![Column::new(NAME_VALUE, ty, gateway.decode_value(key, &data))];
            if ec.props().get_bool(FLAG_SHOW_TYPE) {
                row.push(Column::type_name(NAME_VALUE_TYPE, ty));
            }
            ec.add_output_rows([row]);
            Ok(())
        })
    }
}
