//! Caller-supplied option handling shared by every entry point.

use datalink_core::Params;
use datalink_core::params::value_to_string;
use datalink_types::Warning;

/// Legacy parameter names and the names the service expects today.
pub const LEGACY_ALIASES: [(&str, &str); 5] = [
    ("authtoken", "api_key"),
    ("trim_start", "start_date"),
    ("trim_end", "end_date"),
    ("transformation", "transform"),
    ("sort_order", "order"),
];

/// Rewrite legacy parameter names in place.
///
/// Each alias present yields a [`Warning::DeprecatedParam`]. When both the
/// old and the new name are set, the new one wins and the old is dropped.
pub fn convert_legacy(params: &mut Params) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for (old, new) in LEGACY_ALIASES {
        if let Some(value) = params.remove(old) {
            if !params.contains_key(new) {
                params.insert(new, value);
            }
            warnings.push(Warning::DeprecatedParam {
                old: old.to_string(),
                new: new.to_string(),
            });
        }
    }
    warnings
}

/// Remove `api_key` from the options so it is sent as a credential instead
/// of a query parameter.
pub fn take_api_key(params: &mut Params) -> Option<String> {
    params
        .remove("api_key")
        .map(|v| value_to_string(&v))
        .filter(|k| !k.is_empty())
}
