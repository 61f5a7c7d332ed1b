use std::path::Path;

use datalink_core::params::value_to_string;
use datalink_core::{
    DataLinkError, DatabaseMetadata, DatasetMetadata, DatatableMetadata, Download, HttpMethod,
    ListMeta, ListPage, Params, SeriesReference, TableReference, encode_query,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::DataLink;

fn unwrap_envelope<T: DeserializeOwned>(mut body: Value, key: &str) -> Result<T, DataLinkError> {
    let inner = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| DataLinkError::Decode(format!("response is missing `{key}`")))?;
    Ok(serde_json::from_value(inner)?)
}

fn unwrap_list<T: DeserializeOwned>(
    mut body: Value,
    key: &str,
) -> Result<ListPage<T>, DataLinkError> {
    let items = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| DataLinkError::Decode(format!("response is missing `{key}`")))?;
    let meta: ListMeta = body
        .get_mut("meta")
        .map(Value::take)
        .map(serde_json::from_value)
        .transpose()?
        .unwrap_or_default();
    Ok(ListPage {
        items: serde_json::from_value(items)?,
        meta,
    })
}

fn list_defaults() -> Params {
    Params::new().with("query", "").with("page", 1)
}

impl DataLink {
    /// Catalogue entry of a dataset (`datasets/{db}/{ds}/metadata`).
    ///
    /// # Errors
    /// Returns `InvalidArg` for a malformed code, `NotFound` for an unknown
    /// dataset, or `Decode` for an unexpected payload.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "datalink::router::metadata::dataset_metadata", skip(self))
    )]
    pub async fn dataset_metadata(&self, code: &str) -> Result<DatasetMetadata, DataLinkError> {
        let reference = SeriesReference::new(code)?;
        let path = format!(
            "datasets/{}/{}/metadata",
            reference.database_code(),
            reference.dataset_code()
        );
        let body = self.get_json(path, &Params::new()).await?;
        unwrap_envelope(body, "dataset")
    }

    /// Catalogue entry of a database (`databases/{code}`).
    ///
    /// # Errors
    /// Returns `InvalidArg` for an empty code, `NotFound` for an unknown
    /// database, or `Decode` for an unexpected payload.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "datalink::router::metadata::database_metadata", skip(self))
    )]
    pub async fn database_metadata(&self, code: &str) -> Result<DatabaseMetadata, DataLinkError> {
        let code = database_code(code)?;
        let body = self.get_json(format!("databases/{code}"), &Params::new()).await?;
        unwrap_envelope(body, "database")
    }

    /// Catalogue entry of a datatable (`datatables/{code}/metadata`).
    ///
    /// # Errors
    /// Returns `InvalidArg` for a malformed code, `NotFound` for an unknown
    /// table, or `Decode` for an unexpected payload.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "datalink::router::metadata::datatable_metadata", skip(self))
    )]
    pub async fn datatable_metadata(
        &self,
        code: &str,
    ) -> Result<DatatableMetadata, DataLinkError> {
        let reference = TableReference::new(code)?;
        let path = format!("datatables/{}/metadata", reference.code());
        let body = self.get_json(path, &Params::new()).await?;
        unwrap_envelope(body, "datatable")
    }

    /// One page of the database catalogue (`databases`).
    ///
    /// `query` defaults to empty and `page` to 1; `per_page` and the other
    /// listing options pass through. An `api_key` option overrides the
    /// configured key.
    ///
    /// # Errors
    /// Returns any taxonomy error from the service, or `Decode` for an
    /// unexpected payload.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "datalink::router::metadata::databases", skip(self, params))
    )]
    pub async fn databases(
        &self,
        params: Params,
    ) -> Result<ListPage<DatabaseMetadata>, DataLinkError> {
        let (client, mut params, _) = self.scoped(params);
        params.apply_defaults(&list_defaults());
        let body = client.get_json("databases".into(), &params).await?;
        unwrap_list(body, "databases")
    }

    /// One page of the datasets in `database_code` (`datasets`).
    ///
    /// Paging options behave as in [`DataLink::databases`]; the code always
    /// replaces any `database_code` option.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an empty code, any taxonomy error from the
    /// service, or `Decode` for an unexpected payload.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "datalink::router::metadata::datasets", skip(self, params))
    )]
    pub async fn datasets(
        &self,
        database_code: &str,
        params: Params,
    ) -> Result<ListPage<DatasetMetadata>, DataLinkError> {
        let code = self::database_code(database_code)?;
        let (client, mut params, _) = self.scoped(params);
        params.apply_defaults(&list_defaults());
        params.insert("database_code", code);
        let body = client.get_json("datasets".into(), &params).await?;
        unwrap_list(body, "datasets")
    }

    /// Stream a database's bulk archive (`databases/{code}/data`) to disk.
    ///
    /// When `dest` is an existing directory the file is named after the last
    /// path segment of the final (post-redirect) URL; otherwise `dest` is the
    /// file path. Options such as `download_type=partial` are sent as query
    /// parameters and an `api_key` option overrides the configured key.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an empty code, the taxonomy error for a
    /// failed response (nothing is written), or `Transport` when the file
    /// cannot be written.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "datalink::router::metadata::bulk_download_to_file",
            skip(self, dest, params)
        )
    )]
    pub async fn bulk_download_to_file(
        &self,
        code: &str,
        dest: impl AsRef<Path>,
        params: Params,
    ) -> Result<Download, DataLinkError> {
        let code = database_code(code)?;
        let (client, params, _) = self.scoped(params);
        let path = format!("databases/{code}/data");
        let request = client.prepare(HttpMethod::Get, path, &params);
        client.transport.download(request, dest.as_ref()).await
    }

    /// Absolute URL of a database's bulk download.
    ///
    /// The configured API key and version are added as `api_key` and
    /// `api_version` query parameters, followed by `params` (scalars only,
    /// e.g. `download_type=partial`). No request is made.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an empty code.
    pub fn bulk_download_url(&self, code: &str, params: &Params) -> Result<String, DataLinkError> {
        let code = database_code(code)?;
        let mut pairs: Vec<(String, String)> = Vec::new();
        if let Some(key) = &self.cfg.api_key {
            pairs.push(("api_key".into(), key.clone()));
        }
        if let Some(version) = &self.cfg.api_version {
            pairs.push(("api_version".into(), version.clone()));
        }
        pairs.extend(
            params
                .iter()
                .filter(|(k, _)| k.as_str() != "api_key" && k.as_str() != "api_version")
                .map(|(k, v)| (k.clone(), value_to_string(v))),
        );
        let mut url = format!("{}/databases/{code}/data", self.cfg.api_base);
        if !pairs.is_empty() {
            url.push('?');
            url.push_str(&encode_query(&pairs));
        }
        Ok(url)
    }
}

fn database_code(code: &str) -> Result<&str, DataLinkError> {
    let code = code.trim();
    if code.is_empty() || code.contains('/') {
        return Err(DataLinkError::invalid_arg(format!(
            "database code must be a single segment, got '{code}'"
        )));
    }
    Ok(code)
}
