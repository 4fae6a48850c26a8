//! Ad type and ad format enumerations.
//!
//! [`AdsType`] is the inventory category an adapter declares support for.
//! [`AdsFormat`] is the key used for format-specific mediation overrides and
//! owns the compatibility table deciding which requests it represents.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::request::AdRequestParams;

/// Inventory category supported by a network adapter.
///
/// Settings name ad types by their lowercase display name.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdsType {
    #[display("banner")]
    Banner,
    #[display("interstitial")]
    Interstitial,
    #[display("rewarded")]
    Rewarded,
    #[display("native")]
    Native,
}

/// Creative content requested for an ad.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdContentType {
    #[display("all")]
    All,
    #[display("static")]
    Static,
    #[display("video")]
    Video,
}

/// Fixed banner dimensions.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BannerSize {
    #[display("320x50")]
    Size320x50,
    #[display("300x250")]
    Size300x250,
    #[display("728x90")]
    Size728x90,
}

/// Ad format used to key format-specific mediation configuration.
///
/// Variant order matters: overrides are scanned in this order and the last
/// matching format wins, so specific formats are declared after the generic
/// format of the same ad type. Settings key overrides by the display name,
/// which serde shares.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AdsFormat {
    #[display("banner")]
    Banner,
    #[display("banner_320x50")]
    #[serde(rename = "banner_320x50")]
    Banner320x50,
    #[display("banner_300x250")]
    #[serde(rename = "banner_300x250")]
    Banner300x250,
    #[display("banner_728x90")]
    #[serde(rename = "banner_728x90")]
    Banner728x90,
    #[display("interstitial")]
    Interstitial,
    #[display("interstitial_static")]
    InterstitialStatic,
    #[display("interstitial_video")]
    InterstitialVideo,
    #[display("rewarded")]
    Rewarded,
    #[display("rewarded_static")]
    RewardedStatic,
    #[display("rewarded_video")]
    RewardedVideo,
    #[display("native")]
    Native,
}

impl AdsFormat {
    /// Every format in scan order.
    pub const ALL: [AdsFormat; 11] = [
        Self::Banner,
        Self::Banner320x50,
        Self::Banner300x250,
        Self::Banner728x90,
        Self::Interstitial,
        Self::InterstitialStatic,
        Self::InterstitialVideo,
        Self::Rewarded,
        Self::RewardedStatic,
        Self::RewardedVideo,
        Self::Native,
    ];

    /// Ad type this format belongs to.
    #[must_use]
    pub fn ads_type(self) -> AdsType {
        match self {
            Self::Banner | Self::Banner320x50 | Self::Banner300x250 | Self::Banner728x90 => {
                AdsType::Banner
            }
            Self::Interstitial | Self::InterstitialStatic | Self::InterstitialVideo => {
                AdsType::Interstitial
            }
            Self::Rewarded | Self::RewardedStatic | Self::RewardedVideo => AdsType::Rewarded,
            Self::Native => AdsType::Native,
        }
    }

    /// Content type this format represents; `All` accepts any request.
    #[must_use]
    pub fn content_type(self) -> AdContentType {
        match self {
            Self::InterstitialStatic | Self::RewardedStatic => AdContentType::Static,
            Self::InterstitialVideo | Self::RewardedVideo => AdContentType::Video,
            _ => AdContentType::All,
        }
    }

    /// Banner size this format is pinned to, if any.
    #[must_use]
    pub fn banner_size(self) -> Option<BannerSize> {
        match self {
            Self::Banner320x50 => Some(BannerSize::Size320x50),
            Self::Banner300x250 => Some(BannerSize::Size300x250),
            Self::Banner728x90 => Some(BannerSize::Size728x90),
            _ => None,
        }
    }

    /// Whether this format represents the given request.
    #[must_use]
    pub fn matches(
        self,
        ads_type: AdsType,
        request: &AdRequestParams,
        content_type: AdContentType,
    ) -> bool {
        if self.ads_type() != ads_type {
            return false;
        }
        let own_content = self.content_type();
        if own_content != AdContentType::All && own_content != content_type {
            return false;
        }
        match self.banner_size() {
            Some(size) => request.banner_size() == Some(size),
            None => true,
        }
    }
}
