//! Process-wide default configuration and one-call convenience functions.
//!
//! The default is seeded from the environment on first use. Each convenience
//! call reads it once, builds a client, and never touches it again, so a
//! concurrent [`set_config`] only affects later calls.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, PoisonError, RwLock};

use datalink_core::{DataLinkError, Download, FetchResult, Params};
use datalink_types::ApiConfig;

use crate::DataLink;
use crate::credentials;
use crate::router::dataset::Selector;
use crate::router::point_in_time::{PitInterval, PitRequest};
use crate::router::table::TableRequest;

static DEFAULT: LazyLock<RwLock<ApiConfig>> = LazyLock::new(|| RwLock::new(ApiConfig::from_env()));

/// Snapshot of the process-wide configuration.
#[must_use]
pub fn config() -> ApiConfig {
    DEFAULT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replace the process-wide configuration.
pub fn set_config(cfg: ApiConfig) {
    *DEFAULT.write().unwrap_or_else(PoisonError::into_inner) = cfg;
}

/// Set the process-wide API key.
pub fn set_api_key(key: impl Into<String>) {
    DEFAULT
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .api_key = Some(key.into());
}

/// Save `key` to the key file and make it the process-wide key.
///
/// # Errors
/// See [`credentials::save_key`].
pub fn save_key(key: &str, path: Option<&Path>) -> Result<PathBuf, DataLinkError> {
    let written = credentials::save_key(key, path)?;
    set_api_key(key.trim());
    Ok(written)
}

/// Load the key file into the process-wide configuration.
///
/// # Errors
/// See [`credentials::read_key`].
pub fn read_key(path: Option<&Path>) -> Result<String, DataLinkError> {
    let key = credentials::read_key(path)?;
    set_api_key(key.clone());
    Ok(key)
}

/// Client over the current process-wide configuration.
///
/// # Errors
/// See [`crate::DataLinkBuilder::build`].
pub fn client() -> Result<DataLink, DataLinkError> {
    DataLink::new(config())
}

/// [`DataLink::get`] with the process-wide configuration.
///
/// # Errors
/// See [`DataLink::get`].
pub async fn get(selector: impl Into<Selector>, params: Params) -> Result<FetchResult, DataLinkError> {
    client()?.get(selector, params).await
}

/// [`DataLink::get_table`] with the process-wide configuration.
///
/// # Errors
/// See [`DataLink::get_table`].
pub async fn get_table(
    code: &str,
    params: Params,
    paginate: bool,
) -> Result<FetchResult, DataLinkError> {
    let request = TableRequest::new(code).params(params).paginate(paginate);
    client()?.get_table(request).await
}

/// [`DataLink::point_in_time`] with the process-wide configuration.
///
/// # Errors
/// See [`DataLink::point_in_time`].
pub async fn get_point_in_time(
    code: &str,
    interval: PitInterval,
    params: Params,
    paginate: bool,
) -> Result<FetchResult, DataLinkError> {
    let request = PitRequest::new(code, interval)
        .params(params)
        .paginate(paginate);
    client()?.point_in_time(request).await
}

/// [`DataLink::bulk_download_url`] with the process-wide configuration.
///
/// # Errors
/// See [`DataLink::bulk_download_url`].
pub fn bulk_download_url(code: &str, params: &Params) -> Result<String, DataLinkError> {
    client()?.bulk_download_url(code, params)
}

/// [`DataLink::bulk_download_to_file`] with the process-wide configuration.
///
/// # Errors
/// See [`DataLink::bulk_download_to_file`].
pub async fn bulk_download_to_file(
    code: &str,
    dest: impl AsRef<Path>,
    params: Params,
) -> Result<Download, DataLinkError> {
    client()?.bulk_download_to_file(code, dest, params).await
}
