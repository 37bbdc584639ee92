//! Viridian control-plane commands.

mod get_cluster;
mod list_clusters;
mod login;

use std::future::Future;
use std::pin::Pin;

use chrono::DateTime;
use clc_plug::{Column, Command, Declaration, ExecContext, Result, Row};
use clc_proto::{Value, ValueType};
use clc_viridian::Cluster;

pub use get_cluster::ViridianGetClusterCommand;
pub use list_clusters::ViridianListClustersCommand;
pub use login::ViridianLoginCommand;

const GROUP_VIRIDIAN: &str = "viridian";

/// `viridian`: parent of the control-plane commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct ViridianGroup;

impl Command for ViridianGroup {
    fn init(&self, decl: &mut Declaration) -> Result<()> {
        decl.add_command_group(GROUP_VIRIDIAN, "Viridian")
            .set_command_group(GROUP_VIRIDIAN)
            .set_command_help(
                "Manage Viridian clusters through the control-plane API",
                "Viridian operations",
            );
        Ok(())
    }

    fn exec<'a>(
        &'a self,
        _ec: &'a ExecContext,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async { Ok(()) })
    }
}

fn cluster_summary(cluster: &Cluster) -> Row {
    vec![
        Column::string("ID", cluster.id.as_str()),
        Column::string("Name", cluster.name.as_str()),
        Column::string("State", cluster.state.as_str()),
        Column::string("Hazelcast Version", cluster.hazelcast_version.as_str()),
    ]
}

fn cluster_details(cluster: &Cluster) -> Row {
    let mut row = cluster_summary(cluster);
    row.extend([
        time_column("Creation Time", cluster.creation_time),
        time_column("Start Time", cluster.start_time),
        yes_no_column("Hot Backup Enabled", cluster.hot_backup_enabled),
        yes_no_column("Hot Restart Enabled", cluster.hot_restart_enabled),
        yes_no_column("IP Whitelist Enabled", cluster.ip_whitelist_enabled),
        Column::new(
            "Regions",
            ValueType::STRING_ARRAY,
            Value::StringArray(cluster.regions.iter().map(|r| r.title.clone()).collect()),
        ),
        Column::string("Cluster Type", cluster.cluster_type.title()),
    ]);
    row
}

// Zero means the control plane never reported the time.
fn time_column(name: &str, millis: i64) -> Column {
    match DateTime::from_timestamp_millis(millis).filter(|_| millis != 0) {
        Some(at) => Column::new(
            name,
            ValueType::JAVA_LOCAL_DATE_TIME,
            Value::DateTime(at.naive_utc()),
        ),
        None => Column::new(name, ValueType::NULL, Value::Null),
    }
}

fn yes_no_column(name: &str, value: bool) -> Column {
    Column::string(name, if value { "yes" } else { "no" })
}
