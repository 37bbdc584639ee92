use std::future::Future;
use std::pin::Pin;

use clc_plug::{Command, Declaration, Error, ExecContext, Result};

use super::cluster_summary;

/// `viridian:list-clusters`: one row per cluster the account can see.
#[derive(Debug, Default, Clone, Copy)]
pub struct ViridianListClustersCommand;

impl Command for ViridianListClustersCommand {
    fn init(&self, decl: &mut Declaration) -> Result<()> {
        decl.set_positional_arg_count(0, 0)
            .set_command_help("List the clusters of the logged-in account", "List clusters");
        Ok(())
    }

    fn exec<'a>(
        &'a self,
        ec: &'a ExecContext,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let api = ec.api().await?;
            let clusters = ec
                .execute_blocking("Retrieving clusters", |_, _| async move {
                    Ok::<_, Error>(api.list_clusters().await?)
                })
                .await?;
            ec.add_output_rows(clusters.iter().map(cluster_summary));
            Ok(())
        })
    }
}
