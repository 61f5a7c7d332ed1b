use datalink_core::{
    ColumnSpec, DataLinkError, FetchResult, Metadata, Params, ResultKind, TableReference, Warning,
};
use serde_json::Value;

use crate::DataLink;

/// What the paginator does once `page_limit` pages have been fetched and
/// the service still reports a next cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PageLimitPolicy {
    /// Stop and attach [`Warning::PageLimitReached`].
    Warn,
    /// Fail with `LimitExceeded`.
    Fail,
}

/// A datatable request: code, filters, and whether to follow cursors.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRequest {
    code: String,
    params: Params,
    paginate: bool,
}

impl TableRequest {
    /// Request for the first page of `code` (`VENDOR/TABLE`).
    ///
    /// The code is validated when the request runs.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            params: Params::new(),
            paginate: false,
        }
    }

    /// Replace the filters and `qopts`.
    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Follow `next_cursor_id` until the table is exhausted or the page limit
    /// is reached.
    #[must_use]
    pub const fn paginate(mut self, yes: bool) -> Self {
        self.paginate = yes;
        self
    }

    /// Table code as given.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

/// Builder bound to a client; see [`DataLink::table`].
pub struct TableBuilder<'a> {
    pub(crate) client: &'a DataLink,
    pub(crate) request: TableRequest,
}

impl<'a> TableBuilder<'a> {
    /// Create a new builder bound to a `DataLink` client.
    #[must_use]
    pub fn new(client: &'a DataLink, code: impl Into<String>) -> Self {
        Self {
            client,
            request: TableRequest::new(code),
        }
    }

    /// Replace the filters and `qopts`.
    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.request = self.request.params(params);
        self
    }

    /// Follow cursors; see [`TableRequest::paginate`].
    #[must_use]
    pub fn paginate(mut self, yes: bool) -> Self {
        self.request = self.request.paginate(yes);
        self
    }

    /// Execute the request.
    ///
    /// # Errors
    /// See [`DataLink::get_table`].
    pub async fn run(self) -> Result<FetchResult, DataLinkError> {
        self.client.get_table(self.request).await
    }
}

impl DataLink {
    /// Start a datatable request for `code`.
    ///
    /// ```rust,ignore
    /// let fc = client
    ///     .table("ZACKS/FC")
    ///     .params(Params::new().with("ticker", json!(["AAPL", "MSFT"])))
    ///     .paginate(true)
    ///     .run()
    ///     .await?;
    /// ```
    #[must_use]
    pub fn table(&self, code: impl Into<String>) -> TableBuilder<'_> {
        TableBuilder::new(self, code)
    }

    /// Fetch a datatable from `datatables/{code}`.
    ///
    /// Behavior and trade-offs:
    /// - Pages are fetched one after another. After each page the loop stops
    ///   when there is no next cursor, when `page_limit` pages have been read
    ///   (`PageLimitReached` warning), or when pagination was not requested
    ///   (`MorePagesAvailable` warning).
    /// - Warnings never fail the call; the rows fetched so far are returned.
    /// - Long filter lists switch the request to POST with a JSON body.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a malformed code, `InvalidData` when pages
    /// disagree on columns or a row has the wrong width, or any service error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "datalink::router::table::get_table",
            skip(self, request),
            fields(code = %request.code, paginate = request.paginate),
        )
    )]
    pub async fn get_table(&self, request: TableRequest) -> Result<FetchResult, DataLinkError> {
        let reference = TableReference::new(&request.code)?;
        let (client, params, warnings) = self.scoped(request.params);
        let path = format!("datatables/{}", reference.code());
        let result = client
            .paginate(
                &path,
                &reference.code(),
                &params,
                request.paginate,
                PageLimitPolicy::Warn,
            )
            .await?;
        Ok(result.with_warnings(warnings))
    }

    /// Cursor loop shared by datatables and point-in-time tables.
    pub(crate) async fn paginate(
        &self,
        path: &str,
        code: &str,
        params: &Params,
        paginate: bool,
        policy: PageLimitPolicy,
    ) -> Result<FetchResult, DataLinkError> {
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;
        let mut columns: Option<Vec<ColumnSpec>> = None;
        let mut rows = Vec::new();
        let mut meta: Metadata;
        let mut warnings = Vec::new();

        loop {
            let mut page_params = params.clone();
            if let Some(c) = &cursor {
                page_params.insert_nested("qopts", "cursor_id", c.clone());
            }
            let body = self.table_json(path.to_string(), &page_params).await?;
            let page = Page::decode(body)?;
            pages += 1;

            match &columns {
                None => columns = Some(page.columns.clone()),
                Some(first) if *first != page.columns => {
                    return Err(DataLinkError::invalid_data(format!(
                        "{code}: page {pages} columns differ from the first page"
                    )));
                }
                Some(_) => {}
            }
            let names: Vec<String> = page.columns.iter().map(|c| c.name.clone()).collect();
            let (_, page_rows, _, _) =
                FetchResult::from_json_rows(names, &page.data, Metadata::default(), ResultKind::Table)?
                    .into_parts();
            rows.extend(page_rows);
            cursor = page.meta.next_cursor_id.clone();
            meta = page.meta;

            let Some(next) = cursor.clone() else {
                break;
            };
            if pages >= self.cfg.page_limit {
                match policy {
                    PageLimitPolicy::Warn => {
                        warnings.push(Warning::PageLimitReached {
                            code: code.to_string(),
                            pages,
                            limit: self.cfg.page_limit,
                        });
                        break;
                    }
                    PageLimitPolicy::Fail => {
                        return Err(DataLinkError::limit_exceeded(format!(
                            "{code}: more than {} pages; use a bulk export to download the full table",
                            self.cfg.page_limit
                        )));
                    }
                }
            }
            if !paginate {
                warnings.push(Warning::MorePagesAvailable {
                    code: code.to_string(),
                    next_cursor_id: next,
                });
                break;
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(code, pages, cursor = %next, "following cursor");
        }

        crate::router::report(&warnings);
        let columns = columns.unwrap_or_default();
        let names = columns.iter().map(|c| c.name.clone()).collect();
        meta.columns = Some(columns);
        Ok(FetchResult::new(names, rows, meta, ResultKind::Table)?.with_warnings(warnings))
    }
}

/// One decoded `{"datatable": {...}, "meta": {...}}` page.
struct Page {
    columns: Vec<ColumnSpec>,
    data: Vec<Value>,
    meta: Metadata,
}

impl Page {
    fn decode(mut body: Value) -> Result<Self, DataLinkError> {
        let mut table = body
            .get_mut("datatable")
            .map(Value::take)
            .ok_or_else(|| DataLinkError::Decode("response is missing `datatable`".into()))?;
        let columns: Vec<ColumnSpec> = match table.get_mut("columns").map(Value::take) {
            Some(Value::Null) | None => Vec::new(),
            Some(v) => serde_json::from_value(v)?,
        };
        let data = match table.get_mut("data").map(Value::take) {
            Some(Value::Array(rows)) => rows,
            Some(Value::Null) | None => Vec::new(),
            Some(_) => return Err(DataLinkError::invalid_data("`data` is not an array")),
        };
        let meta = match body.get_mut("meta").map(Value::take) {
            Some(m @ Value::Object(_)) => serde_json::from_value(m)?,
            _ => Metadata::default(),
        };
        Ok(Self { columns, data, meta })
    }
}
