use datalink_core::{
    DataLinkError, FetchResult, Metadata, Params, ResultKind, SeriesReference, constructed_path,
};
use serde_json::Value;

use crate::DataLink;

const DATA_PATH: &str = "datasets/:database_code/:dataset_code/data";

/// Which failures of a single-series fetch are downgraded to the empty
/// not-found placeholder (columns `["None", "Not Found"]`).
///
/// No other error kind is ever downgraded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchFlags {
    /// Tolerate a series that does not exist.
    pub handle_not_found: bool,
    /// Tolerate a requested column that does not exist.
    pub handle_column_not_found: bool,
}

impl FetchFlags {
    /// Every failure is returned as an error.
    pub const STRICT: Self = Self {
        handle_not_found: false,
        handle_column_not_found: false,
    };

    /// Missing series and missing columns become placeholders.
    pub const TOLERANT: Self = Self {
        handle_not_found: true,
        handle_column_not_found: true,
    };

    /// Whether `err` is downgraded under these flags.
    #[must_use]
    pub const fn tolerates(&self, err: &DataLinkError) -> bool {
        (self.handle_not_found && err.is_not_found())
            || (self.handle_column_not_found && err.is_column_not_found())
    }
}

/// One series or several series to merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// A single series, optionally narrowed to columns.
    One(SeriesReference),
    /// Several series outer-joined on their date axis.
    Many(Vec<SeriesReference>),
}

impl Selector {
    /// Parse one `"DB/CODE"` or `"DB/CODE.N"` selector.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a malformed code or column suffix.
    pub fn parse(code: &str) -> Result<Self, DataLinkError> {
        SeriesReference::parse(code).map(Self::One)
    }

    /// Parse a list of selectors to merge.
    ///
    /// # Errors
    /// Returns `InvalidArg` for the first malformed entry.
    pub fn parse_many<S: AsRef<str>>(codes: &[S]) -> Result<Self, DataLinkError> {
        codes
            .iter()
            .map(|c| SeriesReference::parse(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::Many)
    }
}

impl From<SeriesReference> for Selector {
    fn from(r: SeriesReference) -> Self {
        Self::One(r)
    }
}

impl From<Vec<SeriesReference>> for Selector {
    fn from(refs: Vec<SeriesReference>) -> Self {
        Self::Many(refs)
    }
}

impl DataLink {
    /// Fetch a single series or merge several.
    ///
    /// Behavior and trade-offs:
    /// - `One`: a missing column yields the not-found placeholder; a missing
    ///   series is an error.
    /// - `Many`: merged with both tolerances on, so a missing series or column
    ///   contributes a `"<code> - Not Found"` column instead of failing.
    /// - Legacy parameter names are rewritten (with warnings attached to the
    ///   result) and an `api_key` option overrides the configured key.
    ///
    /// # Errors
    /// Returns any non-tolerated taxonomy error, `InvalidArg` for bad
    /// references, or `InvalidData` for a malformed payload.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "datalink::router::dataset::get", skip(self, selector, params))
    )]
    pub async fn get(
        &self,
        selector: impl Into<Selector>,
        params: Params,
    ) -> Result<FetchResult, DataLinkError> {
        let (client, params, warnings) = self.scoped(params);
        let result = match selector.into() {
            Selector::One(reference) => {
                let flags = FetchFlags {
                    handle_not_found: false,
                    handle_column_not_found: true,
                };
                client.fetch_series(&reference, params, flags).await?
            }
            Selector::Many(refs) => {
                client
                    .merge_series(&refs, params, FetchFlags::TOLERANT)
                    .await?
            }
        };
        Ok(result.with_warnings(warnings))
    }

    /// Fetch one series from `datasets/{db}/{ds}/data`.
    ///
    /// Behavior and trade-offs:
    /// - `order=asc` is sent unless the caller set `order`.
    /// - A reference narrowed to one column sends it as `column_index` and lets
    ///   the server filter. Several columns are fetched in full and projected
    ///   locally.
    /// - Failures matching `flags` become the not-found placeholder.
    ///
    /// # Errors
    /// Returns `InvalidData` when a row width differs from the column count,
    /// `ColumnNotFound` when the server reports an unknown column, or any
    /// error not tolerated by `flags`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "datalink::router::dataset::fetch_series",
            skip(self, params),
            fields(code = %reference),
        )
    )]
    pub async fn fetch_series(
        &self,
        reference: &SeriesReference,
        params: Params,
        flags: FetchFlags,
    ) -> Result<FetchResult, DataLinkError> {
        match self.fetch_series_strict(reference, params).await {
            Err(e) if flags.tolerates(&e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(code = %reference, error = %e, "series replaced by placeholder");
                Ok(FetchResult::not_found())
            }
            other => other,
        }
    }

    async fn fetch_series_strict(
        &self,
        reference: &SeriesReference,
        mut params: Params,
    ) -> Result<FetchResult, DataLinkError> {
        reference.check_lower_bounds()?;
        params.apply_defaults(&Params::new().with("order", "asc"));
        params.insert("database_code", reference.database_code());
        params.insert("dataset_code", reference.dataset_code());
        if let [index] = reference.columns() {
            params.insert("column_index", *index);
        }
        let path = constructed_path(DATA_PATH, &mut params);
        let body = self.get_json(path, &params).await?;
        let result = parse_dataset_data(body)?;
        match reference.columns() {
            [] | [_] => Ok(result),
            many => narrow(result, many, &reference.code()),
        }
    }
}

/// Decode `{"dataset_data": {...}}` into a series result.
fn parse_dataset_data(mut body: Value) -> Result<FetchResult, DataLinkError> {
    let Some(Value::Object(mut obj)) = body.get_mut("dataset_data").map(Value::take) else {
        return Err(DataLinkError::Decode(
            "response is missing `dataset_data`".into(),
        ));
    };
    let data = match obj.remove("data") {
        Some(Value::Array(rows)) => rows,
        Some(Value::Null) | None => Vec::new(),
        Some(_) => return Err(DataLinkError::invalid_data("`data` is not an array")),
    };
    let meta: Metadata = serde_json::from_value(Value::Object(obj))?;

    let names = meta.column_names.clone().unwrap_or_default();
    if meta.column_index.is_some() && data.is_empty() && names.iter().any(Option::is_none) {
        return Err(DataLinkError::column_not_found(format!(
            "the column index {} you requested does not exist",
            meta.column_index.unwrap_or_default()
        )));
    }
    let columns = meta.column_name_strings();
    FetchResult::from_json_rows(columns, &data, meta, ResultKind::Series)
}

/// Keep the date axis plus the given 1-based value columns.
fn narrow(
    result: FetchResult,
    indexes: &[i64],
    context: &str,
) -> Result<FetchResult, DataLinkError> {
    let table = result.to_table().keep_columns(indexes, context)?;
    let (_, _, mut meta, warnings) = result.into_parts();
    let mut columns = Vec::with_capacity(table.columns().len() + 1);
    columns.push(table.index_name().unwrap_or_default().to_string());
    columns.extend(table.columns().iter().cloned());
    meta.column_names = Some(columns.iter().cloned().map(Some).collect());
    let rows = table.to_flat_list();
    Ok(FetchResult::new(columns, rows, meta, ResultKind::Series)?.with_warnings(warnings))
}
