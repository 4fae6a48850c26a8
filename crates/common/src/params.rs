//! Storage for the three configuration layers of a network.
//!
//! - global network params (app id, placement id, ...)
//! - base mediation config, applied to every ad format
//! - per-format mediation config overrides
//!
//! Setters replace a layer wholesale; empty input clears it. The single-entry
//! setters lazily create their layer and reject empty keys.

use std::collections::{BTreeMap, HashMap};

use error_stack::{ensure, Report};

use crate::ads::AdsFormat;
use crate::error::NetworkConfigError;

/// Key/value parameters handed to a network.
pub type Params = HashMap<String, String>;

/// The configuration layers owned by one resolver.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    network_params: Option<Params>,
    base_mediation_config: Option<Params>,
    typed_mediation_configs: BTreeMap<AdsFormat, Params>,
}

fn collect_layer<I, K, V>(entries: I) -> Option<Params>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let layer: Params = entries
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect();
    (!layer.is_empty()).then_some(layer)
}

fn upsert(
    layer: &mut Option<Params>,
    name: &str,
    key: String,
    value: String,
) -> Result<(), Report<NetworkConfigError>> {
    ensure!(
        !key.is_empty(),
        NetworkConfigError::InvalidArgument {
            message: format!("{} key must not be empty", name),
        }
    );
    layer.get_or_insert_with(HashMap::new).insert(key, value);
    Ok(())
}

impl ParameterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the global network params.
    pub fn set_network_params<I, K, V>(&mut self, params: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.network_params = collect_layer(params);
        self
    }

    /// Insert or update one global network param.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkConfigError::InvalidArgument`] if `key` is empty.
    pub fn set_network_param(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, Report<NetworkConfigError>> {
        upsert(
            &mut self.network_params,
            "Network param",
            key.into(),
            value.into(),
        )?;
        Ok(self)
    }

    /// Replace the base mediation config.
    pub fn set_base_mediation_config<I, K, V>(&mut self, config: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.base_mediation_config = collect_layer(config);
        self
    }

    /// Insert or update one base mediation param.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkConfigError::InvalidArgument`] if `key` is empty.
    pub fn set_base_mediation_param(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, Report<NetworkConfigError>> {
        upsert(
            &mut self.base_mediation_config,
            "Base mediation param",
            key.into(),
            value.into(),
        )?;
        Ok(self)
    }

    /// Replace the override for `format`, or remove it when `config` is empty.
    pub fn set_mediation_config<I, K, V>(&mut self, format: AdsFormat, config: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        match collect_layer(config) {
            Some(layer) => {
                self.typed_mediation_configs.insert(format, layer);
            }
            None => {
                self.typed_mediation_configs.remove(&format);
            }
        }
        self
    }

    #[must_use]
    pub fn network_params(&self) -> Option<&Params> {
        self.network_params.as_ref()
    }

    #[must_use]
    pub fn base_mediation_config(&self) -> Option<&Params> {
        self.base_mediation_config.as_ref()
    }

    #[must_use]
    pub fn mediation_config(&self, format: AdsFormat) -> Option<&Params> {
        self.typed_mediation_configs.get(&format)
    }

    /// Configured overrides in format declaration order.
    pub fn mediation_configs(&self) -> impl Iterator<Item = (AdsFormat, &Params)> {
        self.typed_mediation_configs
            .iter()
            .map(|(format, config)| (*format, config))
    }
}
