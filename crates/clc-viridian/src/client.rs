//! Generic JSON request/response helper.
//!
//! # Example
//!
//! ```rust,no_run
//! use clc_viridian::{ApiClient, ApiConfig, Cluster};
//!
//! # async fn example() -> clc_viridian::Result<()> {
//! let client = ApiClient::new(&ApiConfig::from_env(), "token");
//! let clusters: Vec<Cluster> = client.get_wrapped("/cluster").await?;
//! println!("{} clusters", clusters.len());
//! # Ok(())
//! # }
//! ```

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::Wrapper;

/// HTTP client bound to one base URL and, optionally, one bearer token.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    token: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("authenticated", &!self.token.is_empty())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client. An empty token makes anonymous calls.
    #[must_use]
    pub fn new(config: &ApiConfig, token: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), config, token)
    }

    /// Create a client around an existing `reqwest` client.
    #[must_use]
    pub fn with_http_client(
        http: reqwest::Client,
        config: &ApiConfig,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            config: config.clone(),
            token: token.into(),
        }
    }

    /// The bearer token, empty for anonymous clients.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The configuration the client was built from.
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// `GET path` and decode the body as `T`.
    ///
    /// # Errors
    ///
    /// Returns a network, status or decode error.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.send(self.request(Method::GET, path)).await?;
        decode(&body)
    }

    /// `GET path` from a list-shaped endpoint and unwrap its envelope.
    ///
    /// # Errors
    ///
    /// Returns a network, status or decode error.
    pub async fn get_wrapped<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let wrapper: Wrapper<T> = self.get(path).await?;
        Ok(wrapper.content)
    }

    /// `POST path` with a JSON body and decode the response as `Resp`.
    ///
    /// # Errors
    ///
    /// Returns an encode, network, status or decode error.
    pub async fn post<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_vec(request).map_err(Error::Encode)?;
        let body = self.post_bytes(path, payload).await?;
        decode(&body)
    }

    /// `POST path` with raw bytes and return the raw response body.
    ///
    /// # Errors
    ///
    /// Returns a network or status error.
    pub async fn post_bytes(&self, path: &str, payload: Vec<u8>) -> Result<Vec<u8>> {
        self.send(self.request(Method::POST, path).body(payload)).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.url(path);
        trace!(%method, %url, "building request");
        let builder = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        if self.token.is_empty() {
            builder
        } else {
            builder.header(AUTHORIZATION, format!("Bearer {}", self.token))
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Vec<u8>> {
        let response = builder.send().await.map_err(Error::Request)?;
        let status = response.status();
        let body = response.bytes().await.map_err(Error::ReadBody)?;
        debug!(status = status.as_u16(), len = body.len(), "received response");
        if status == StatusCode::OK {
            Ok(body.to_vec())
        } else {
            Err(Error::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        }
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(Error::Decode)
}
