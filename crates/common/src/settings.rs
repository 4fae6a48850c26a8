//! Network configuration loaded from TOML with environment overrides.
//!
//! ```toml
//! [networks.admob]
//! ad_types = ["banner", "rewarded"]
//!
//! [networks.admob.network_params]
//! app_id = "ca-app-123"
//!
//! [networks.admob.base_mediation_config]
//! zone = "default"
//!
//! [networks.admob.mediation.banner_320x50]
//! zone = "small-banner"
//! ```
//!
//! Any value can be overridden with `NETWORK_CONFIG__<PATH>` environment
//! variables, e.g. `NETWORK_CONFIG__NETWORKS__ADMOB__NETWORK_PARAMS__APP_ID`.
//!
//! Environment paths are lowercased before they are merged, so only
//! lowercase keys can be overridden this way. `NETWORK_CONFIG__..__APPID`
//! adds a separate `appid` entry next to a TOML `appId`; TOML keys keep
//! their case.
//!
//! Format and ad type names are deserialized straight into [`AdsFormat`] and
//! [`AdsType`], so an unknown name fails to load.

use std::collections::HashMap;

use config::{Config, Environment, File, FileFormat};
use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::ads::{AdsFormat, AdsType};
use crate::error::NetworkConfigError;
use crate::params::Params;

pub const ENVIRONMENT_VARIABLE_PREFIX: &str = "NETWORK_CONFIG";
pub const ENVIRONMENT_VARIABLE_SEPARATOR: &str = "__";

fn validate_param_keys(params: &Params) -> Result<(), ValidationError> {
    if params.keys().any(String::is_empty) {
        return Err(ValidationError::new("empty_param_key"));
    }
    Ok(())
}

fn validate_mediation_keys(mediation: &HashMap<AdsFormat, Params>) -> Result<(), ValidationError> {
    mediation.values().try_for_each(validate_param_keys)
}

/// Settings section for one network, keyed by the adapter's network key.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct NetworkSettings {
    #[serde(default)]
    #[validate(custom(function = "validate_param_keys"))]
    pub network_params: Params,

    #[serde(default)]
    #[validate(custom(function = "validate_param_keys"))]
    pub base_mediation_config: Params,

    /// Format-specific overrides keyed by format name (e.g. `banner_320x50`).
    #[serde(default)]
    #[validate(custom(function = "validate_mediation_keys"))]
    pub mediation: HashMap<AdsFormat, Params>,

    /// Optional ad type restriction (e.g. `["banner", "rewarded"]`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_types: Option<Vec<AdsType>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub networks: HashMap<String, NetworkSettings>,
}

impl Settings {
    /// Parse settings from a TOML string, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkConfigError::Configuration`] if the TOML is invalid,
    /// cannot be deserialized, or fails validation.
    pub fn from_toml(toml_str: &str) -> Result<Self, Report<NetworkConfigError>> {
        let environment = Environment::default()
            .prefix(ENVIRONMENT_VARIABLE_PREFIX)
            .separator(ENVIRONMENT_VARIABLE_SEPARATOR);

        let toml = File::from_str(toml_str, FileFormat::Toml);
        let config = Config::builder()
            .add_source(toml)
            .add_source(environment)
            .build()
            .change_context(NetworkConfigError::Configuration {
                message: "Failed to build configuration".to_string(),
            })?;

        let settings: Self =
            config
                .try_deserialize()
                .change_context(NetworkConfigError::Configuration {
                    message: "Failed to deserialize configuration".to_string(),
                })?;
        settings.validate()?;

        log::debug!("Loaded settings for {} networks", settings.networks.len());
        Ok(settings)
    }

    /// Validate every network section.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkConfigError::Configuration`] naming the first invalid
    /// network.
    pub fn validate(&self) -> Result<(), Report<NetworkConfigError>> {
        for (key, network) in &self.networks {
            network
                .validate()
                .change_context(NetworkConfigError::Configuration {
                    message: format!("Settings for network '{}' failed validation", key),
                })?;
        }
        Ok(())
    }

    /// Settings section for the network with the given key.
    #[must_use]
    pub fn network(&self, key: &str) -> Option<&NetworkSettings> {
        self.networks.get(key)
    }
}
