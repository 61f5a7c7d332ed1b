//! Request options shared by every router.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Row ordering requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Oldest first.
    #[default]
    Asc,
    /// Newest first.
    Desc,
}

impl Order {
    /// Wire name of the ordering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Server-side frequency change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Collapse {
    /// Keep the native frequency.
    None,
    /// One row per day.
    Daily,
    /// One row per week.
    Weekly,
    /// One row per month.
    Monthly,
    /// One row per quarter.
    Quarterly,
    /// One row per year.
    Annual,
}

impl Collapse {
    /// Wire name of the collapse.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annual => "annual",
        }
    }
}

/// Server-side elementary calculation applied to every column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Transform {
    /// Raw values.
    None,
    /// Row-on-row change.
    Diff,
    /// Row-on-row percentage change.
    Rdiff,
    /// Percentage change from the latest value.
    RdiffFrom,
    /// Cumulative sum.
    Cumul,
    /// Scaled so the first value is 100.
    Normalize,
}

impl Transform {
    /// Wire name of the transform.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Diff => "diff",
            Self::Rdiff => "rdiff",
            Self::RdiffFrom => "rdiff_from",
            Self::Cumul => "cumul",
            Self::Normalize => "normalize",
        }
    }
}

/// Ordered request options.
///
/// Values are scalars, arrays, or one-level objects (e.g. `qopts`). The map
/// is ordered so the flattened query string is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a raw value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder form of [`Params::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key.inner` inside a one-level object, creating it if needed.
    ///
    /// A non-object value already stored under `key` is replaced.
    pub fn insert_nested(
        &mut self,
        key: impl Into<String>,
        inner: impl Into<String>,
        value: impl Into<Value>,
    ) {
        let slot = self
            .0
            .entry(key.into())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(serde_json::Map::new());
        }
        if let Value::Object(map) = slot {
            map.insert(inner.into(), value.into());
        }
    }

    /// Raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Remove and return the value for `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no options are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over options in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Fill in `defaults` for keys the caller did not set.
    pub fn apply_defaults(&mut self, defaults: &Self) {
        for (k, v) in &defaults.0 {
            self.0.entry(k.clone()).or_insert_with(|| v.clone());
        }
    }

    /// Value rendered as a path or query token (strings unquoted).
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.0.get(key).map(value_to_string)
    }

    /// Ordering requested by the caller, if any and if recognised.
    #[must_use]
    pub fn order(&self) -> Option<Order> {
        match self.0.get("order").and_then(Value::as_str) {
            Some("asc") => Some(Order::Asc),
            Some("desc") => Some(Order::Desc),
            _ => None,
        }
    }

    /// `start_date=YYYY-MM-DD`.
    #[must_use]
    pub fn start_date(self, date: NaiveDate) -> Self {
        self.with("start_date", date.format("%Y-%m-%d").to_string())
    }

    /// `end_date=YYYY-MM-DD`.
    #[must_use]
    pub fn end_date(self, date: NaiveDate) -> Self {
        self.with("end_date", date.format("%Y-%m-%d").to_string())
    }

    /// `collapse=<frequency>`.
    #[must_use]
    pub fn collapse(self, collapse: Collapse) -> Self {
        self.with("collapse", collapse.as_str())
    }

    /// `transform=<calculation>`.
    #[must_use]
    pub fn transform(self, transform: Transform) -> Self {
        self.with("transform", transform.as_str())
    }

    /// `rows=<n>`: limit the number of rows returned.
    #[must_use]
    pub fn rows(self, rows: u64) -> Self {
        self.with("rows", rows)
    }

    /// `order=asc|desc`.
    #[must_use]
    pub fn ordered(self, order: Order) -> Self {
        self.with("order", order.as_str())
    }

    /// `column_index=<n>`: server-side single column filter.
    #[must_use]
    pub fn column_index(self, index: i64) -> Self {
        self.with("column_index", index)
    }

    /// `per_page=<n>` inside `qopts`.
    #[must_use]
    pub fn per_page(mut self, per_page: u64) -> Self {
        self.insert_nested("qopts", "per_page", per_page);
        self
    }

    /// `columns=[..]` inside `qopts`.
    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cols: Vec<Value> = columns.into_iter().map(|c| Value::String(c.into())).collect();
        self.insert_nested("qopts", "columns", Value::Array(cols));
        self
    }

    /// `cursor_id=<id>` inside `qopts`.
    #[must_use]
    pub fn cursor_id(mut self, cursor: impl Into<String>) -> Self {
        self.insert_nested("qopts", "cursor_id", cursor.into());
        self
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Render a JSON scalar the way it appears in a URL: strings without quotes,
/// null as the empty string, everything else via its JSON text.
#[must_use]
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
