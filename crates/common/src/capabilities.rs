//! Supported ad type resolution.
//!
//! The adapter declares what it can serve; the integrator may restrict that
//! further. The intersection keeps the adapter's declared order and is
//! computed once per resolver: later changes to the restriction do not
//! affect an already resolved set.

use error_stack::Report;
use once_cell::sync::OnceCell;

use crate::adapter::AdapterHandle;
use crate::ads::AdsType;
use crate::error::NetworkConfigError;

/// Filter `declared` down to the types allowed by `restriction`.
///
/// With no restriction every declared type is kept.
#[must_use]
pub fn intersect(declared: &[AdsType], restriction: Option<&[AdsType]>) -> Vec<AdsType> {
    declared
        .iter()
        .copied()
        .filter(|ads_type| match restriction {
            Some(allowed) => allowed.contains(ads_type),
            None => true,
        })
        .collect()
}

/// Integrator restriction plus the memoized resolved set.
#[derive(Debug, Default)]
pub struct CapabilityFilter {
    restriction: Option<Vec<AdsType>>,
    resolved: OnceCell<Vec<AdsType>>,
}

impl CapabilityFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the allowed ad types.
    ///
    /// Has no effect on a set that was already resolved.
    pub fn restrict_to(&mut self, ads_types: impl IntoIterator<Item = AdsType>) -> &mut Self {
        if self.resolved.get().is_some() {
            log::debug!("Ad type restriction changed after supported types were resolved");
        }
        self.restriction = Some(ads_types.into_iter().collect());
        self
    }

    #[must_use]
    pub fn restriction(&self) -> Option<&[AdsType]> {
        self.restriction.as_deref()
    }

    /// Resolve the supported types, creating the adapter if needed.
    ///
    /// # Errors
    ///
    /// Propagates adapter construction failures. Nothing is cached on failure.
    pub fn resolve(&self, adapter: &AdapterHandle) -> Result<&[AdsType], Report<NetworkConfigError>> {
        let resolved = self.resolved.get_or_try_init(|| {
            let adapter = adapter.get()?;
            let resolved = intersect(adapter.supported_types(), self.restriction());
            log::debug!(
                "Resolved supported ad types for '{}': {:?}",
                adapter.key(),
                resolved
            );
            Ok::<_, Report<NetworkConfigError>>(resolved)
        })?;
        Ok(resolved.as_slice())
    }
}
