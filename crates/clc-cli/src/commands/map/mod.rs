//! Distributed map commands.

mod entry_set;
mod get;

use std::future::Future;
use std::pin::Pin;

use clc_plug::{Command, Declaration, ExecContext, Result};

pub use entry_set::MapEntrySetCommand;
pub use get::MapGetCommand;

use super::{FLAG_NAME, FLAG_SHOW_TYPE, GROUP_DDS};

/// `map`: carries the shared `--name` and `--show-type` flags.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapGroup;

impl Command for MapGroup {
    fn init(&self, decl: &mut Declaration) -> Result<()> {
        decl.add_command_group(GROUP_DDS, "Distributed Data Structures")
            .set_command_group(GROUP_DDS)
            .add_string_flag(FLAG_NAME, Some('n'), "default", false, "map name")
            .add_bool_flag(FLAG_SHOW_TYPE, None, "add the type names to the output")
            .set_command_help("Map operations", "Map operations");
        Ok(())
    }

    fn exec<'a>(
        &'a self,
        _ec: &'a ExecContext,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async { Ok(()) })
    }
}
