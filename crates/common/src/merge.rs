//! Effective parameter resolution.
//!
//! Layers are applied lowest precedence first, each overwriting the previous
//! one on key collision:
//!
//! 1. global network params (only when the provider enables it)
//! 2. base mediation config
//! 3. the matched format-specific override
//!
//! Every result is a freshly allocated map; the stored layers are only read.

use crate::ads::{AdContentType, AdsFormat, AdsType};
use crate::logging::is_debug_enabled;
use crate::params::{ParameterStore, Params};
use crate::request::AdRequestParams;

/// Read-only merge view over a [`ParameterStore`].
#[derive(Debug, Clone, Copy)]
pub struct MediationMerger<'a> {
    store: &'a ParameterStore,
    include_network_params: bool,
}

impl<'a> MediationMerger<'a> {
    #[must_use]
    pub fn new(store: &'a ParameterStore, include_network_params: bool) -> Self {
        Self {
            store,
            include_network_params,
        }
    }

    /// Global network params, regardless of the merge policy.
    #[must_use]
    pub fn network_params(&self) -> Option<&'a Params> {
        self.store.network_params()
    }

    /// Override configured for exactly `format`.
    #[must_use]
    pub fn override_for(&self, format: AdsFormat) -> Option<&'a Params> {
        self.store.mediation_config(format)
    }

    /// Select the override matching a request.
    ///
    /// All configured overrides are scanned in format declaration order and
    /// the last match wins.
    #[must_use]
    pub fn select_override(
        &self,
        ads_type: AdsType,
        request: &AdRequestParams,
        content_type: AdContentType,
    ) -> Option<(AdsFormat, &'a Params)> {
        let mut selected = None;
        for (format, config) in self.store.mediation_configs() {
            if format.matches(ads_type, request, content_type) {
                log::trace!("Format {} matches {} ({})", format, ads_type, content_type);
                selected = Some((format, config));
            }
        }
        selected
    }

    /// Resolve the effective params for a request, or `None` when no
    /// format-specific override matches.
    #[must_use]
    pub fn resolve(
        &self,
        ads_type: AdsType,
        request: &AdRequestParams,
        content_type: AdContentType,
    ) -> Option<Params> {
        let (format, config) = self.select_override(ads_type, request, content_type)?;
        let merged = self.layer_over(config);
        if is_debug_enabled() {
            let mut keys: Vec<&str> = merged.keys().map(String::as_str).collect();
            keys.sort_unstable();
            log::debug!(
                "Resolved mediation params {:?} for {} using format {}",
                keys,
                ads_type,
                format
            );
        }
        Some(merged)
    }

    /// Merge the shared layers under `config` into a new map.
    #[must_use]
    pub fn layer_over(&self, config: &Params) -> Params {
        let mut merged = Params::new();
        if self.include_network_params {
            if let Some(network_params) = self.store.network_params() {
                merged.extend(network_params.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        if let Some(base) = self.store.base_mediation_config() {
            merged.extend(base.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged.extend(config.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }
}
