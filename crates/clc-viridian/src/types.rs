//! Control-plane payload types.

use serde::{Deserialize, Serialize};

/// Envelope used by list-shaped endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wrapper<T> {
    /// The wrapped payload.
    pub content: T,
}

/// A Viridian cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cluster {
    /// Cluster id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Lifecycle state, e.g. `RUNNING`.
    pub state: String,
    /// Hazelcast version the cluster runs.
    pub hazelcast_version: String,
    /// Creation time, milliseconds since the epoch.
    pub creation_time: i64,
    /// Last start time, milliseconds since the epoch.
    pub start_time: i64,
    /// Whether hot backup is enabled.
    pub hot_backup_enabled: bool,
    /// Whether hot restart is enabled.
    pub hot_restart_enabled: bool,
    /// Whether the IP whitelist is enabled.
    pub ip_whitelist_enabled: bool,
    /// Regions the cluster is deployed to.
    pub regions: Vec<Region>,
    /// Cluster tier.
    pub cluster_type: ClusterType,
}

/// A deployment region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Region {
    /// Region title.
    pub title: String,
}

/// Cluster tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterType {
    /// Whether this is a development cluster.
    pub dev_mode: bool,
}

impl ClusterType {
    /// Human-readable tier name.
    #[must_use]
    pub const fn title(self) -> &'static str {
        if self.dev_mode { "Development" } else { "Production" }
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    /// API key.
    pub api_key: &'a str,
    /// API secret.
    pub api_secret: &'a str,
}

/// Login response body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent calls.
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_list_unwraps() {
        let body = r#"{"content":[{"id":"c1","name":"dev","state":"RUNNING",
            "hazelcastVersion":"5.3.0","regions":[{"title":"us-east-1"}],
            "clusterType":{"devMode":true}}]}"#;
        let wrapped: Wrapper<Vec<Cluster>> = serde_json::from_str(body).expect("decode");
        let cluster = &wrapped.content[0];
        assert_eq!(cluster.id, "c1");
        assert_eq!(cluster.hazelcast_version, "5.3.0");
        assert_eq!(cluster.regions[0].title, "us-east-1");
        assert_eq!(cluster.cluster_type.title(), "Development");
        assert_eq!(cluster.creation_time, 0);
    }

    #[test]
    fn login_request_uses_camel_case() {
        let body = serde_json::to_string(&LoginRequest {
            api_key: "k",
            api_secret: "s",
        })
        .expect("encode");
        assert_eq!(body, r#"{"apiKey":"k","apiSecret":"s"}"#);
    }
}
