//! Registry of configured networks.
//!
//! Networks keep their registration order, which the mediation waterfall
//! uses as its default ordering. Registering a network whose key is already
//! present replaces the earlier entry in place.

use error_stack::Report;

use crate::adapter::NetworkProvider;
use crate::ads::{AdContentType, AdsType};
use crate::error::NetworkConfigError;
use crate::network_config::NetworkConfig;
use crate::params::Params;
use crate::request::AdRequestParams;
use crate::settings::Settings;

/// Ordered, key-deduplicated set of network resolvers.
#[derive(Debug, Default)]
pub struct NetworkRegistry {
    networks: Vec<NetworkConfig>,
}

impl NetworkRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry with one resolver per provider, applying the settings
    /// section named by each network's key.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter cannot be constructed.
    pub fn from_settings(
        settings: &Settings,
        providers: Vec<Box<dyn NetworkProvider>>,
    ) -> Result<Self, Report<NetworkConfigError>> {
        log::info!("Building network registry");

        let mut registry = Self::new();
        for provider in providers {
            let mut config = NetworkConfig::from_boxed(provider);
            let key = config.key()?.to_string();
            match settings.network(&key) {
                Some(section) => {
                    config.apply_settings(section);
                }
                None => log::debug!("No settings section for network '{}'", key),
            }
            registry.register(config)?;
        }

        log::info!("Network registry built with {} networks", registry.len());
        Ok(registry)
    }

    /// Register a resolver, replacing any resolver with the same key.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the adapter cannot be constructed.
    pub fn register(&mut self, config: NetworkConfig) -> Result<(), Report<NetworkConfigError>> {
        let key = config.key()?.to_string();
        match self.networks.iter().position(|existing| *existing == config) {
            Some(index) => {
                log::warn!("Network '{}' registered twice, replacing previous config", key);
                self.networks[index] = config;
            }
            None => {
                log::info!("Registering network: {}", key);
                self.networks.push(config);
            }
        }
        Ok(())
    }

    /// Resolver registered under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&NetworkConfig> {
        self.networks
            .iter()
            .find(|config| config.key().is_ok_and(|own| own == key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Resolvers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &NetworkConfig> {
        self.networks.iter()
    }

    /// Resolvers allowed to serve `ads_type`, in registration order.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter cannot be constructed.
    pub fn networks_for(
        &self,
        ads_type: AdsType,
    ) -> Result<Vec<&NetworkConfig>, Report<NetworkConfigError>> {
        let mut supporting = Vec::new();
        for config in &self.networks {
            if config.resolve_supported_types()?.contains(&ads_type) {
                supporting.push(config);
            }
        }
        Ok(supporting)
    }

    /// Effective params of every network that supports `ads_type` and has a
    /// matching format override, keyed by network.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter cannot be constructed.
    pub fn collect_mediation_configs(
        &self,
        ads_type: AdsType,
        request: &AdRequestParams,
        content_type: AdContentType,
    ) -> Result<Vec<(String, Params)>, Report<NetworkConfigError>> {
        let mut configs = Vec::new();
        for config in self.networks_for(ads_type)? {
            if let Some(params) = config.resolve_params(ads_type, request, content_type) {
                configs.push((config.key()?.to_string(), params));
            }
        }
        log::debug!(
            "Collected mediation configs for {} from {} networks",
            ads_type,
            configs.len()
        );
        Ok(configs)
    }
}
