use std::future::Future;
use std::pin::Pin;

use clc_plug::{Command, Declaration, Error, ExecContext, Result};

use super::{cluster_details, cluster_summary};
use crate::app::PROP_VERBOSE;

const ARG_CLUSTER: &str = "cluster";

/// `viridian:get-cluster CLUSTER`: show one cluster, found by id or name.
#[derive(Debug, Default, Clone, Copy)]
pub struct ViridianGetClusterCommand;

impl Command for ViridianGetClusterCommand {
    fn init(&self, decl: &mut Declaration) -> Result<()> {
        decl.add_string_arg(ARG_CLUSTER, "CLUSTER_NAME_OR_ID").set_command_help(
            "Show a cluster. With --verbose, times, backup settings and regions are included",
            "Show a cluster",
        );
        Ok(())
    }

    fn exec<'a>(
        &'a self,
        ec: &'a ExecContext,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let id_or_name = ec.required_arg(ARG_CLUSTER)?;
            let api = ec.api().await?;
            let cluster = ec
                .execute_blocking("Retrieving the cluster", |_, _| async move {
                    Ok::<_, Error>(api.get_cluster(id_or_name).await?)
                })
                .await?;
            let row = if ec.props().get_bool(PROP_VERBOSE) {
                cluster_details(&cluster)
            } else {
                cluster_summary(&cluster)
            };
            ec.add_output_rows([row]);
            Ok(())
        })
    }
}
