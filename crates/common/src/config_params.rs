//! Read-only configuration view handed to network adapters.

use std::collections::BTreeMap;

use crate::ads::AdsFormat;
use crate::merge::MediationMerger;
use crate::params::Params;

/// Narrow accessor over a resolver's configuration.
///
/// Adapters receive this instead of the resolver itself, so they can read
/// the global params and per-format configs but never mutate them.
#[derive(Debug, Clone, Copy)]
pub struct NetworkConfigParams<'a> {
    merger: MediationMerger<'a>,
}

impl<'a> NetworkConfigParams<'a> {
    pub(crate) fn new(merger: MediationMerger<'a>) -> Self {
        Self { merger }
    }

    /// Copy of the global network params, if any were configured.
    #[must_use]
    pub fn obtain_network_params(&self) -> Option<Params> {
        self.merger.network_params().cloned()
    }

    /// Merged mediation configs for each requested format that has an
    /// override. Returns `None` when none of them do.
    #[must_use]
    pub fn obtain_network_mediation_configs(
        &self,
        formats: &[AdsFormat],
    ) -> Option<BTreeMap<AdsFormat, Params>> {
        let configs: BTreeMap<AdsFormat, Params> = formats
            .iter()
            .filter_map(|format| {
                self.merger
                    .override_for(*format)
                    .map(|config| (*format, self.merger.layer_over(config)))
            })
            .collect();
        (!configs.is_empty()).then_some(configs)
    }
}
