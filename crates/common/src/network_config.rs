//! Per-network configuration resolver.
//!
//! A [`NetworkConfig`] owns the configuration layers of one third-party ad
//! network and answers two questions for the mediation layer:
//!
//! - which parameters should the network receive for a request
//!   ([`NetworkConfig::resolve_params`])
//! - which ad types may the network serve (crate-internal, see
//!   [`crate::registry::NetworkRegistry::networks_for`])
//!
//! Two resolvers are equal when their adapters report the same key.
//!
//! `NetworkConfig` is `Send + Sync`. Readers may share it across threads and
//! the adapter and the resolved ad types are still built at most once.

use std::fmt;
use std::hash::{Hash, Hasher};

use error_stack::Report;

use crate::adapter::{AdapterHandle, NetworkAdapter, NetworkProvider};
use crate::ads::{AdContentType, AdsFormat, AdsType};
use crate::capabilities::CapabilityFilter;
use crate::config_params::NetworkConfigParams;
use crate::error::NetworkConfigError;
use crate::merge::MediationMerger;
use crate::params::{ParameterStore, Params};
use crate::request::AdRequestParams;
use crate::settings::NetworkSettings;

/// Configuration resolver for a single network.
pub struct NetworkConfig {
    adapter: AdapterHandle,
    store: ParameterStore,
    capabilities: CapabilityFilter,
}

impl NetworkConfig {
    /// Create a resolver. The adapter is not constructed until first needed.
    #[must_use]
    pub fn new(provider: impl NetworkProvider + 'static) -> Self {
        Self::from_boxed(Box::new(provider))
    }

    #[must_use]
    pub fn from_boxed(provider: Box<dyn NetworkProvider>) -> Self {
        Self {
            adapter: AdapterHandle::new(provider),
            store: ParameterStore::new(),
            capabilities: CapabilityFilter::new(),
        }
    }

    /// Unique network key reported by the adapter.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the adapter cannot be constructed.
    pub fn key(&self) -> Result<&str, Report<NetworkConfigError>> {
        Ok(self.adapter.get()?.key())
    }

    /// Network adapter version.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the adapter cannot be constructed.
    pub fn version(&self) -> Result<&str, Report<NetworkConfigError>> {
        Ok(self.adapter.get()?.version())
    }

    /// The network adapter, constructed on first access.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the adapter cannot be constructed.
    pub fn adapter(&self) -> Result<&dyn NetworkAdapter, Report<NetworkConfigError>> {
        self.adapter.get()
    }

    /// Replace the global network params used to initialize the network.
    pub fn with_network_params<I, K, V>(&mut self, params: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.store.set_network_params(params);
        self
    }

    /// Set one global network param.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkConfigError::InvalidArgument`] if `key` is empty.
    pub fn set_network_param(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, Report<NetworkConfigError>> {
        self.store.set_network_param(key, value)?;
        Ok(self)
    }

    /// Replace the base mediation config shared by every ad format.
    pub fn with_base_mediation_config<I, K, V>(&mut self, config: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.store.set_base_mediation_config(config);
        self
    }

    /// Set one base mediation param.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkConfigError::InvalidArgument`] if `key` is empty.
    pub fn set_base_mediation_param(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, Report<NetworkConfigError>> {
        self.store.set_base_mediation_param(key, value)?;
        Ok(self)
    }

    /// Replace the mediation config for `format`; empty input removes it.
    pub fn with_mediation_config<I, K, V>(&mut self, format: AdsFormat, config: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.store.set_mediation_config(format, config);
        self
    }

    /// Restrict the ad types this network may serve.
    pub fn for_ad_types(&mut self, ads_types: impl IntoIterator<Item = AdsType>) -> &mut Self {
        self.capabilities.restrict_to(ads_types);
        self
    }

    /// Apply a loaded settings section. Empty sections leave the current
    /// layer untouched.
    pub fn apply_settings(&mut self, settings: &NetworkSettings) -> &mut Self {
        if !settings.network_params.is_empty() {
            self.with_network_params(settings.network_params.clone());
        }
        if !settings.base_mediation_config.is_empty() {
            self.with_base_mediation_config(settings.base_mediation_config.clone());
        }
        for (format, config) in &settings.mediation {
            self.with_mediation_config(*format, config.clone());
        }
        if let Some(ad_types) = &settings.ad_types {
            self.for_ad_types(ad_types.iter().copied());
        }
        self
    }

    fn merger(&self) -> MediationMerger<'_> {
        MediationMerger::new(&self.store, self.adapter.use_network_params_as_mediation_base())
    }

    /// Effective parameters for a request, or `None` when no format-specific
    /// override matches it.
    ///
    /// The returned map is a new copy; later changes to this resolver never
    /// affect it.
    #[must_use]
    pub fn resolve_params(
        &self,
        ads_type: AdsType,
        request: &AdRequestParams,
        content_type: AdContentType,
    ) -> Option<Params> {
        self.merger().resolve(ads_type, request, content_type)
    }

    /// Ad types this network may serve, resolved once per resolver.
    pub(crate) fn resolve_supported_types(
        &self,
    ) -> Result<&[AdsType], Report<NetworkConfigError>> {
        self.capabilities.resolve(&self.adapter)
    }

    /// Read-only view handed to the network adapter.
    #[must_use]
    pub fn network_config_params(&self) -> NetworkConfigParams<'_> {
        NetworkConfigParams::new(self.merger())
    }

    /// Initialize the network adapter with this resolver's configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter cannot be constructed or rejects the
    /// configuration.
    pub fn initialize_adapter(
        &self,
        request: &AdRequestParams,
    ) -> Result<(), Report<NetworkConfigError>> {
        let adapter = self.adapter.get()?;
        log::debug!("Initializing network '{}'", adapter.key());
        adapter.initialize(request, &self.network_config_params())
    }
}

impl PartialEq for NetworkConfig {
    fn eq(&self, other: &Self) -> bool {
        match (self.key(), other.key()) {
            (Ok(own), Ok(theirs)) => own == theirs,
            _ => std::ptr::eq(self, other),
        }
    }
}

impl Eq for NetworkConfig {}

/// Hashes the adapter key.
///
/// A resolver whose adapter has not been built yet asks the provider again on
/// every call, so its hash can change once construction succeeds. Call
/// [`NetworkConfig::key`] successfully before using a resolver as a map or
/// set key.
impl Hash for NetworkConfig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Unkeyed resolvers are only equal to themselves.
        self.key().ok().hash(state);
    }
}

impl fmt::Debug for NetworkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkConfig")
            .field("adapter", &self.adapter)
            .field("store", &self.store)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::ads::BannerSize;
    use crate::test_support::tests::MockProvider;

    fn hash_of(config: &NetworkConfig) -> u64 {
        let mut hasher = DefaultHasher::new();
        config.hash(&mut hasher);
        hasher.finish()
    }

    fn banner() -> (AdsType, AdRequestParams, AdContentType) {
        (AdsType::Banner, AdRequestParams::default(), AdContentType::All)
    }

    #[test]
    fn test_key_and_version_pass_through() {
        let config = NetworkConfig::new(MockProvider::new("admob").with_version("22.1.0"));

        assert_eq!(config.key().expect("key"), "admob");
        assert_eq!(config.version().expect("version"), "22.1.0");
        assert_eq!(config.adapter().expect("adapter").key(), "admob");
    }

    #[test]
    fn test_adapter_is_lazy() {
        let provider = MockProvider::new("admob");
        let created = provider.creation_counter();
        let mut config = NetworkConfig::new(provider);

        config
            .with_network_params([("app_id", "1")])
            .with_mediation_config(AdsFormat::Banner, [("zone", "b")]);
        assert_eq!(created.load(Ordering::SeqCst), 0);

        config.key().expect("key");
        config.version().expect("version");
        assert_eq!(created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_merged_example() {
        let mut config = NetworkConfig::new(MockProvider::new("admob"));
        config
            .with_network_params([("appId", "1")])
            .with_base_mediation_config([("appId", "2"), ("zone", "x")])
            .with_mediation_config(AdsFormat::Banner, [("zone", "y")]);

        let (ads_type, request, content) = banner();
        let merged = config
            .resolve_params(ads_type, &request, content)
            .expect("banner override");

        let expected: Params = [("appId", "2"), ("zone", "y")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_policy_disabled_excludes_network_params() {
        let mut config =
            NetworkConfig::new(MockProvider::new("vungle").without_network_params_base());
        config
            .with_network_params([("appId", "1")])
            .with_mediation_config(AdsFormat::Banner, [("zone", "y")]);

        let (ads_type, request, content) = banner();
        let merged = config
            .resolve_params(ads_type, &request, content)
            .expect("banner override");
        assert!(!merged.contains_key("appId"));
    }

    #[test]
    fn test_no_override_ignores_other_layers() {
        let mut config = NetworkConfig::new(MockProvider::new("admob"));
        config
            .with_network_params([("appId", "1")])
            .with_base_mediation_config([("zone", "x")]);

        let (ads_type, request, content) = banner();
        assert!(config.resolve_params(ads_type, &request, content).is_none());
    }

    #[test]
    fn test_returned_params_are_independent() {
        let mut config = NetworkConfig::new(MockProvider::new("admob"));
        config
            .with_network_params([("appId", "1")])
            .with_mediation_config(AdsFormat::Banner, [("zone", "y")]);

        let (ads_type, request, content) = banner();
        let mut first = config
            .resolve_params(ads_type, &request, content)
            .expect("override");
        first.insert("zone".to_string(), "mutated".to_string());

        config
            .set_network_param("appId", "2")
            .expect("valid key")
            .with_mediation_config(AdsFormat::Banner, [("zone", "z")]);

        assert_eq!(first.get("appId").map(String::as_str), Some("1"));
        let second = config
            .resolve_params(ads_type, &request, content)
            .expect("override");
        assert_eq!(second.get("appId").map(String::as_str), Some("2"));
        assert_eq!(second.get("zone").map(String::as_str), Some("z"));
    }

    #[test]
    fn test_sized_banner_override() {
        let mut config = NetworkConfig::new(MockProvider::new("admob"));
        config
            .with_base_mediation_config([("zone", "base")])
            .with_mediation_config(AdsFormat::Banner, [("unit", "flex")])
            .with_mediation_config(AdsFormat::Banner300x250, [("unit", "mrec")]);

        let mrec = config
            .resolve_params(
                AdsType::Banner,
                &AdRequestParams::banner(BannerSize::Size300x250),
                AdContentType::All,
            )
            .expect("mrec");
        assert_eq!(mrec.get("unit").map(String::as_str), Some("mrec"));
        assert_eq!(mrec.get("zone").map(String::as_str), Some("base"));
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut config = NetworkConfig::new(MockProvider::new("admob"));
        let err = config
            .set_base_mediation_param("", "x")
            .err()
            .expect("empty key");
        assert!(matches!(
            err.current_context(),
            NetworkConfigError::InvalidArgument { .. }
        ));
    }

    #[test]
    fn test_supported_types_restricted_and_cached() {
        let mut config = NetworkConfig::new(MockProvider::new("admob").with_supported_types(&[
            AdsType::Banner,
            AdsType::Interstitial,
            AdsType::Rewarded,
        ]));
        config.for_ad_types([AdsType::Rewarded, AdsType::Banner]);

        let first = config.resolve_supported_types().expect("types").to_vec();
        assert_eq!(first, vec![AdsType::Banner, AdsType::Rewarded]);

        config.for_ad_types([AdsType::Interstitial]);
        assert_eq!(
            config.resolve_supported_types().expect("types"),
            first.as_slice()
        );
    }

    #[test]
    fn test_supported_types_unrestricted() {
        let config = NetworkConfig::new(
            MockProvider::new("admob").with_supported_types(&[AdsType::Native, AdsType::Banner]),
        );
        assert_eq!(
            config.resolve_supported_types().expect("types"),
            &[AdsType::Native, AdsType::Banner]
        );
    }

    #[test]
    #[allow(clippy::mutable_key_type)]
    fn test_equality_by_key_only() {
        let mut first = NetworkConfig::new(MockProvider::new("admob"));
        first.with_network_params([("appId", "1")]);
        let mut second = NetworkConfig::new(MockProvider::new("admob"));
        second.with_network_params([("appId", "2")]);
        let other = NetworkConfig::new(MockProvider::new("vungle"));

        assert_eq!(first, second);
        assert_eq!(hash_of(&first), hash_of(&second));
        assert_ne!(first, other);

        // Adapters are built by now, so the hashes are stable.
        assert!([&first, &second, &other].iter().all(|c| c.key().is_ok()));
        let set: HashSet<NetworkConfig> = [first, second, other].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_hash_stable_once_adapter_built() {
        let config = NetworkConfig::new(MockProvider::new("admob"));
        config.key().expect("key");

        let before = hash_of(&config);
        let mut hasher = DefaultHasher::new();
        Some("admob").hash(&mut hasher);
        assert_eq!(before, hasher.finish());
        assert_eq!(hash_of(&config), before);
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_network_config_is_send_sync() {
        assert_send_sync::<NetworkConfig>();
        assert_send_sync::<NetworkConfigParams<'_>>();
    }

    #[test]
    fn test_concurrent_readers_build_lazy_state_once() {
        let provider = MockProvider::new("admob").with_supported_types(&[
            AdsType::Banner,
            AdsType::Interstitial,
            AdsType::Rewarded,
        ]);
        let created = provider.creation_counter();
        let mut config = NetworkConfig::new(provider);
        config.for_ad_types([AdsType::Rewarded, AdsType::Banner]);
        let config = &config;

        let results: Vec<(&str, &[AdsType])> = std::thread::scope(|scope| {
            let readers: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(move || {
                        let types = config.resolve_supported_types().expect("types");
                        (config.key().expect("key"), types)
                    })
                })
                .collect();
            readers
                .into_iter()
                .map(|reader| reader.join().expect("reader thread"))
                .collect()
        });

        assert_eq!(created.load(Ordering::SeqCst), 1);
        let (_, first_types) = results[0];
        assert_eq!(first_types, &[AdsType::Banner, AdsType::Rewarded]);
        for (key, types) in &results {
            assert_eq!(*key, "admob");
            assert!(std::ptr::eq(*types, first_types));
        }
    }

    #[test]
    fn test_failing_adapter_only_equals_itself() {
        let broken = NetworkConfig::new(MockProvider::new("x").failing());
        let also_broken = NetworkConfig::new(MockProvider::new("x").failing());

        let same = &broken;
        assert!(broken.key().is_err());
        assert!(broken.eq(same));
        assert_ne!(broken, also_broken);
    }

    #[test]
    fn test_initialize_adapter_receives_view() {
        let provider = MockProvider::new("admob");
        let seen = provider.initialized_params();
        let mut config = NetworkConfig::new(provider);
        config
            .with_network_params([("app_id", "1")])
            .with_mediation_config(AdsFormat::Interstitial, [("zone", "i")]);

        config
            .initialize_adapter(&AdRequestParams::default())
            .expect("initialized");

        let seen = seen.lock().expect("lock").clone().expect("initialize called");
        assert_eq!(seen.get("app_id").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_initialize_adapter_propagates_creation_failure() {
        let config = NetworkConfig::new(MockProvider::new("broken").failing());
        assert!(config
            .initialize_adapter(&AdRequestParams::default())
            .is_err());
    }

    #[test]
    fn test_apply_settings() {
        let settings = crate::test_support::tests::create_test_settings();
        let section = settings.network("admob").expect("admob section");

        let mut config = NetworkConfig::new(MockProvider::new("admob").with_supported_types(&[
            AdsType::Banner,
            AdsType::Interstitial,
            AdsType::Rewarded,
        ]));
        config.set_base_mediation_param("keep", "me").expect("valid key");
        config.apply_settings(section);

        let merged = config
            .resolve_params(
                AdsType::Banner,
                &AdRequestParams::banner(BannerSize::Size320x50),
                AdContentType::All,
            )
            .expect("banner override");
        assert_eq!(merged.get("app_id").map(String::as_str), Some("ca-app-123"));
        assert_eq!(merged.get("zone").map(String::as_str), Some("small-banner"));
        assert_eq!(
            config.resolve_supported_types().expect("types"),
            &[AdsType::Banner, AdsType::Rewarded]
        );
    }

    #[test]
    fn test_apply_settings_keeps_layers_for_empty_sections() {
        let mut config = NetworkConfig::new(MockProvider::new("admob"));
        config
            .with_network_params([("app_id", "1")])
            .with_base_mediation_config([("zone", "x")])
            .with_mediation_config(AdsFormat::Native, [("unit", "n")]);

        config.apply_settings(&NetworkSettings::default());

        let merged = config
            .resolve_params(
                AdsType::Native,
                &AdRequestParams::default(),
                AdContentType::All,
            )
            .expect("native override");
        assert_eq!(merged.get("app_id").map(String::as_str), Some("1"));
        assert_eq!(merged.get("zone").map(String::as_str), Some("x"));
        assert_eq!(merged.get("unit").map(String::as_str), Some("n"));
        assert_eq!(config.resolve_supported_types().expect("types").len(), 4);
    }
}
