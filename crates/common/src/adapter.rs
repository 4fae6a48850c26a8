//! Network adapter traits and the lazily constructed adapter handle.

use std::fmt;

use error_stack::Report;
use once_cell::sync::OnceCell;

use crate::ads::AdsType;
use crate::config_params::NetworkConfigParams;
use crate::error::NetworkConfigError;
use crate::request::AdRequestParams;

/// Trait implemented by third-party network adapters.
pub trait NetworkAdapter: Send + Sync {
    /// Unique network key (e.g. "admob", "vungle"). Must not change for the
    /// lifetime of the adapter.
    fn key(&self) -> &str;

    /// Adapter or SDK version string.
    fn version(&self) -> &str;

    /// Ad types the adapter can serve, in the adapter's preferred order.
    fn supported_types(&self) -> &[AdsType];

    /// Initialize the underlying network with the resolved configuration.
    ///
    /// Called by [`crate::network_config::NetworkConfig::initialize_adapter`].
    /// Adapters that need no setup keep the default.
    ///
    /// # Errors
    ///
    /// Returns an error when the network rejects its configuration.
    fn initialize(
        &self,
        _request: &AdRequestParams,
        _params: &NetworkConfigParams<'_>,
    ) -> Result<(), Report<NetworkConfigError>> {
        Ok(())
    }
}

/// Per-network hook that knows how to build its adapter.
pub trait NetworkProvider: Send + Sync {
    /// Construct the network adapter. Called at most once per successful
    /// construction by [`AdapterHandle`].
    ///
    /// # Errors
    ///
    /// Returns an error when the adapter cannot be constructed.
    fn create_adapter(&self) -> Result<Box<dyn NetworkAdapter>, Report<NetworkConfigError>>;

    /// Whether global network params form the bottom layer of every merged
    /// mediation config.
    fn use_network_params_as_mediation_base(&self) -> bool {
        true
    }
}

/// Cached adapter instance scoped to one resolver.
pub struct AdapterHandle {
    provider: Box<dyn NetworkProvider>,
    adapter: OnceCell<Box<dyn NetworkAdapter>>,
}

impl AdapterHandle {
    #[must_use]
    pub fn new(provider: Box<dyn NetworkProvider>) -> Self {
        Self {
            provider,
            adapter: OnceCell::new(),
        }
    }

    /// Return the adapter, constructing it on first access.
    ///
    /// # Errors
    ///
    /// Propagates the provider's construction error unchanged. Nothing is
    /// cached on failure.
    pub fn get(&self) -> Result<&dyn NetworkAdapter, Report<NetworkConfigError>> {
        let adapter = self.adapter.get_or_try_init(|| {
            let adapter = self.provider.create_adapter()?;
            log::debug!(
                "Created network adapter '{}' (version {})",
                adapter.key(),
                adapter.version()
            );
            Ok::<_, Report<NetworkConfigError>>(adapter)
        })?;
        Ok(adapter.as_ref())
    }

    #[must_use]
    pub fn use_network_params_as_mediation_base(&self) -> bool {
        self.provider.use_network_params_as_mediation_base()
    }
}

impl fmt::Debug for AdapterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterHandle")
            .field("adapter", &self.adapter.get().map(|adapter| adapter.key()))
            .finish_non_exhaustive()
    }
}
