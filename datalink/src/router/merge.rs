use datalink_core::{
    DataLinkError, FetchResult, FetchStrategy, MergeInput, Params, SeriesReference,
    merge_series_results,
};

use crate::DataLink;
use crate::router::dataset::FetchFlags;

/// Outcome of the up-front selection check for one series.
#[derive(Clone, Copy)]
enum Planned<'a> {
    Fetch(&'a SeriesReference),
    Placeholder(&'a SeriesReference),
}

impl DataLink {
    /// Fetch several series and outer-join them on their date axis.
    ///
    /// Behavior and trade-offs:
    /// - A top-level `column_index` option is ignored; columns are chosen per
    ///   reference. One column is filtered server-side, several are fetched in
    ///   full and projected locally after validation against the fetched width.
    /// - Column indexes below 1 are rejected for every reference before any
    ///   request is sent.
    /// - Each series gets its own copy of `params`.
    /// - `Sequential` fetches one series at a time; `Concurrent` issues all
    ///   requests at once. Column order follows the input either way.
    /// - Value columns are renamed `"<code> - <column>"`. Rows are the union of
    ///   all dates, ascending unless `order=desc` was requested. A date repeated
    ///   within one series keeps only its first row.
    /// - With `handle_not_found` a missing series, and with
    ///   `handle_column_not_found` a bad column selection, contributes a single
    ///   `"<code> - Not Found"` column instead of failing the merge.
    ///
    /// # Errors
    /// Returns the first non-tolerated error of any series, or
    /// `ColumnIndexOutOfRange` for an untolerated local selection.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "datalink::router::merge::merge_series",
            skip(self, refs, params),
            fields(series = refs.len(), strategy = ?self.cfg.fetch_strategy),
        )
    )]
    pub async fn merge_series(
        &self,
        refs: &[SeriesReference],
        mut params: Params,
        flags: FetchFlags,
    ) -> Result<FetchResult, DataLinkError> {
        params.remove("column_index");
        let params = params;

        // Every selection is checked before the first request goes out.
        let mut plan = Vec::with_capacity(refs.len());
        for reference in refs {
            match reference.check_lower_bounds() {
                Ok(()) => plan.push(Planned::Fetch(reference)),
                Err(e) if flags.tolerates(&e) => plan.push(Planned::Placeholder(reference)),
                Err(e) => return Err(e),
            }
        }

        let inputs = match self.cfg.fetch_strategy {
            FetchStrategy::Concurrent => {
                let tasks = plan.iter().map(|p| self.merge_input(*p, &params, flags));
                futures::future::join_all(tasks)
                    .await
                    .into_iter()
                    .collect::<Result<Vec<_>, _>>()?
            }
            _ => {
                let mut out = Vec::with_capacity(plan.len());
                for p in &plan {
                    out.push(self.merge_input(*p, &params, flags).await?);
                }
                out
            }
        };

        merge_series_results(inputs, &params, flags.handle_column_not_found)
    }

    async fn merge_input(
        &self,
        planned: Planned<'_>,
        params: &Params,
        flags: FetchFlags,
    ) -> Result<MergeInput, DataLinkError> {
        let reference = match planned {
            Planned::Fetch(r) => r,
            Planned::Placeholder(r) => {
                return Ok(MergeInput::new(r.clone(), FetchResult::not_found()));
            }
        };
        match reference.columns() {
            [] | [_] => {
                let result = self.fetch_series(reference, params.clone(), flags).await?;
                Ok(MergeInput::new(reference.clone(), result))
            }
            many => {
                let whole = reference.clone().with_columns([]);
                let result = self.fetch_series(&whole, params.clone(), flags).await?;
                Ok(MergeInput::new(reference.clone(), result).keep(many.iter().copied()))
            }
        }
    }
}
