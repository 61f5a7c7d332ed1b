pub mod dataset;
pub mod merge;
pub mod metadata;
pub mod point_in_time;
pub mod table;

use datalink_core::Params;
use datalink_types::Warning;

use crate::DataLink;
use crate::params::{convert_legacy, take_api_key};

impl DataLink {
    /// Normalize caller options before routing.
    ///
    /// Legacy aliases are rewritten and an `api_key` option is lifted out of
    /// the query into the credentials of the returned client.
    pub(crate) fn scoped(&self, mut params: Params) -> (Self, Params, Vec<Warning>) {
        let warnings = convert_legacy(&mut params);
        let client = match take_api_key(&mut params) {
            Some(key) => self.with_api_key(key),
            None => self.clone(),
        };
        report(&warnings);
        (client, params, warnings)
    }
}

/// Emit soft warnings through `tracing` when enabled.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub(crate) fn report(warnings: &[Warning]) {
    #[cfg(feature = "tracing")]
    for w in warnings {
        tracing::warn!(target: "datalink", "{w}");
    }
}
