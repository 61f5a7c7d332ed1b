//! Path templating and parameter flattening.
//!
//! Request parameters travel either as a URL query string (GET) or as a JSON
//! body (POST). Both shapes come from the same [`Params`] through
//! [`flatten_params`]; the only difference is whether array values are marked
//! with a trailing `[]` on their key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::form_urlencoded;

use crate::params::{Params, value_to_string};

/// Parameters after one level of object nesting has been promoted to dotted keys.
pub type FlatParams = BTreeMap<String, Value>;

/// Shape the flattened parameters are prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStyle {
    /// Query string; array keys get a `[]` suffix.
    Get,
    /// JSON body; array keys are left bare.
    Post,
}

/// HTTP verb selected for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// `GET` with a query string.
    Get,
    /// `POST` with a JSON body.
    Post,
}

impl HttpMethod {
    /// Flattening style matching this verb.
    #[must_use]
    pub const fn style(self) -> RequestStyle {
        match self {
            Self::Get => RequestStyle::Get,
            Self::Post => RequestStyle::Post,
        }
    }

    /// Upper-case verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Substitute `:name` path segments with values taken from `params`.
///
/// Every key that filled a placeholder is removed from `params`; keys with no
/// matching placeholder are left for the query string.
pub fn constructed_path(template: &str, params: &mut Params) -> String {
    let mut consumed: Vec<String> = Vec::new();
    let segments: Vec<String> = template
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) if params.contains_key(name) => {
                consumed.push(name.to_string());
                params.get_str(name).unwrap_or_default()
            }
            _ => segment.to_string(),
        })
        .collect();
    for key in consumed {
        params.remove(&key);
    }
    segments.join("/")
}

fn array_key(key: &str, style: RequestStyle) -> String {
    match style {
        RequestStyle::Get => format!("{key}[]"),
        RequestStyle::Post => key.to_string(),
    }
}

/// Flatten `params` for transmission.
///
/// Scalars pass through. Arrays are keyed `key[]` in [`RequestStyle::Get`].
/// Non-empty objects promote each member to `outer.inner` (with the same
/// array rule applied to the member). An empty object contributes nothing.
#[must_use]
pub fn flatten_params(params: &Params, style: RequestStyle) -> FlatParams {
    let mut out = FlatParams::new();
    for (key, value) in params {
        match value {
            Value::Array(_) => {
                out.insert(array_key(key, style), value.clone());
            }
            Value::Object(members) => {
                for (inner, v) in members {
                    let nested = format!("{key}.{inner}");
                    let nested = if v.is_array() {
                        array_key(&nested, style)
                    } else {
                        nested
                    };
                    out.insert(nested, v.clone());
                }
            }
            _ => {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    out
}

/// Expand flattened params into `(key, value)` string pairs, one per array element.
#[must_use]
pub fn query_pairs(flat: &FlatParams) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(flat.len());
    for (key, value) in flat {
        match value {
            Value::Array(items) => {
                pairs.extend(items.iter().map(|v| (key.clone(), value_to_string(v))));
            }
            other => pairs.push((key.clone(), value_to_string(other))),
        }
    }
    pairs
}

/// URL-encode pairs as `application/x-www-form-urlencoded`.
#[must_use]
pub fn encode_query(pairs: &[(String, String)]) -> String {
    let mut ser = form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs {
        ser.append_pair(k, v);
    }
    ser.finish()
}

/// JSON body for a POST request.
#[must_use]
pub fn post_body(params: &Params) -> Value {
    Value::Object(flatten_params(params, RequestStyle::Post).into_iter().collect())
}

/// Choose GET or POST for a request to `path`.
///
/// GET is used when `prefer_get` is set and `"{api_base}/{path}/{query}"` is
/// shorter than `max_url_length`.
#[must_use]
pub fn request_method(
    api_base: &str,
    path: &str,
    params: &Params,
    max_url_length: usize,
    prefer_get: bool,
) -> HttpMethod {
    if !prefer_get {
        return HttpMethod::Post;
    }
    let query = encode_query(&query_pairs(&flatten_params(params, RequestStyle::Get)));
    let url_len = api_base.len() + 1 + path.len() + 1 + query.len();
    if url_len < max_url_length {
        HttpMethod::Get
    } else {
        HttpMethod::Post
    }
}
