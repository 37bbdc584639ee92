use std::future::Future;
use std::pin::Pin;

use clc_plug::output::{NAME_KEY, NAME_KEY_TYPE, NAME_VALUE, NAME_VALUE_TYPE};
use clc_plug::{Column, Command, Declaration, ExecContext, Result, Row};
use clc_proto::codec::map::{decode_map_entry_set_response, encode_map_entry_set_request};

use crate::commands::{FLAG_NAME, FLAG_SHOW_TYPE};

// Names an entry key in decode diagnostics; the key itself is what failed.
const KEY_LABEL: &str = "<key>";

/// `map:entry-set`: list every entry of the map.
///
/// Any member can answer for the whole map, so the request goes to a
/// random target.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapEntrySetCommand;

impl Command for MapEntrySetCommand {
    fn init(&self, decl: &mut Declaration) -> Result<()> {
        decl.set_positional_arg_count(0, 0).set_command_help(
            "Get all entries of the given map. May return a lot of data",
            "Get all entries of a map",
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
            let gateway = ec.gateway()?;

            let request = encode_map_entry_set_request(name);
            let response = ec
                .execute_blocking(&format!("Getting entries of map {name}"), move |_, _| {
                    async move { gateway.invoke_on_random_target(request).await }
                })
                .await?;

            let pairs = decode_map_entry_set_response(&response)?;
            let rows: Vec<Row> = pairs
                .iter()
                .map(|(key_data, value_data)| {
                    let key = gateway.decode_value(KEY_LABEL, key_data);
                    let key_label = key.to_string();
                    let value = gateway.decode_value(&key_label, value_data);
                    let mut row = vec![
                        Column::new(NAME_KEY, key_data.value_type(), key),
                        Column::new(NAME_VALUE, value_data.value_type(), value),
                    ];
                    if show_type {
                        row.push(Column::type_name(NAME_KEY_TYPE, key_data.value_type()));
                        row.push(Column::type_name(NAME_VALUE_TYPE, value_data.value_type()));
                    }
                    row
                })
                .collect();
            ec.add_output_rows(rows);
            Ok(())
        })
    }
}
