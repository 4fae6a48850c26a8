//! Per-network configuration resolution for ad mediation.
//!
//! This crate decides, at request time, which key/value parameters a
//! third-party ad network receives and which ad types it may serve.
//!
//! # Modules
//!
//! - [`adapter`]: Network adapter traits and the lazily created adapter handle
//! - [`ads`]: Ad type, content type and ad format enumerations
//! - [`capabilities`]: Supported ad type intersection and caching
//! - [`config_params`]: Read-only configuration view handed to adapters
//! - [`error`]: Error types and error handling utilities
//! - [`logging`]: Logger initialization
//! - [`merge`]: Three-tier merge of network, base and format-specific params
//! - [`network_config`]: The per-network configuration resolver
//! - [`params`]: Storage for the configuration layers
//! - [`registry`]: Ordered set of configured networks
//! - [`request`]: Request context used for format matching
//! - [`settings`]: Configuration loading and validation
//! - [`test_support`]: Testing utilities and mocks

pub mod adapter;
pub mod ads;
pub mod capabilities;
pub mod config_params;
pub mod error;
pub mod logging;
pub mod merge;
pub mod network_config;
pub mod params;
pub mod registry;
pub mod request;
pub mod settings;

pub use adapter::{NetworkAdapter, NetworkProvider};
pub use ads::{AdContentType, AdsFormat, AdsType, BannerSize};
pub use config_params::NetworkConfigParams;
pub use error::NetworkConfigError;
pub use network_config::NetworkConfig;
pub use params::Params;
pub use registry::NetworkRegistry;
pub use request::AdRequestParams;
pub use settings::{NetworkSettings, Settings};
