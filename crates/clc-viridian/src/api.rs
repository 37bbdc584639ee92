//! Typed control-plane endpoints.

use tracing::{debug, info};

use crate::client::ApiClient;
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::{Cluster, LoginRequest, LoginResponse};

/// Path of the login endpoint.
pub const LOGIN_PATH: &str = "/customers/api/login";
/// Path of the cluster collection.
pub const CLUSTERS_PATH: &str = "/cluster";

/// Typed endpoints on top of an authenticated [`ApiClient`].
#[derive(Debug, Clone)]
pub struct Api {
    client: ApiClient,
}

impl Api {
    /// Wrap an existing client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange an API key and secret for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns the underlying client error; a rejected login surfaces as
    /// [`Error::Status`].
    pub async fn login(config: &ApiConfig, api_key: &str, api_secret: &str) -> Result<String> {
        let anonymous = ApiClient::new(config, "");
        let request = LoginRequest {
            api_key,
            api_secret,
        };
        let response: LoginResponse = anonymous.post(LOGIN_PATH, &request).await?;
        info!(base_url = %config.base_url, "logged in");
        Ok(response.token)
    }

    /// The client this API talks through.
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// List every cluster visible to the token.
    ///
    /// # Errors
    ///
    /// Returns the underlying client error.
    pub async fn list_clusters(&self) -> Result<Vec<Cluster>> {
        let clusters: Vec<Cluster> = self.client.get_wrapped(CLUSTERS_PATH).await?;
        debug!(count = clusters.len(), "listed clusters");
        Ok(clusters)
    }

    /// Fetch one cluster by id or by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClusterNotFound`] if nothing matches, otherwise the
    /// underlying client error.
    pub async fn get_cluster(&self, id_or_name: &str) -> Result<Cluster> {
        let id = self.resolve_cluster_id(id_or_name).await?;
        self.client.get(&format!("{CLUSTERS_PATH}/{id}")).await
    }

    async fn resolve_cluster_id(&self, id_or_name: &str) -> Result<String> {
        let clusters = self.list_clusters().await?;
        clusters
            .iter()
            .find(|c| c.id == id_or_name)
            .or_else(|| clusters.iter().find(|c| c.name == id_or_name))
            .map(|c| c.id.clone())
            .ok_or_else(|| Error::ClusterNotFound(id_or_name.to_string()))
    }
}
