//! # clc-viridian
//!
//! Client for the Viridian control-plane REST API.
//!
//! [`ApiClient`] is the generic layer: it builds JSON requests beneath a
//! configurable base URL, attaches a bearer token when one is held, treats
//! `200` as the only success, and decodes bodies into caller-chosen types.
//! [`Api`] adds the typed endpoints the cloud commands use.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use api::Api;
pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{Error, Result};
pub use types::{Cluster, ClusterType, Region, Wrapper};
