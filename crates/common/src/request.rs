//! Request context consulted when matching ad formats.

use crate::ads::BannerSize;

/// Typed parameters of a single ad request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdRequestParams {
    /// Requested banner size; `None` for non-banner or flexible requests.
    banner_size: Option<BannerSize>,
}

impl AdRequestParams {
    /// Create request parameters for a fixed-size banner.
    #[must_use]
    pub fn banner(size: BannerSize) -> Self {
        Self {
            banner_size: Some(size),
        }
    }

    #[must_use]
    pub fn banner_size(&self) -> Option<BannerSize> {
        self.banner_size
    }
}
