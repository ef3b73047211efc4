// crates/citydex-core/src/provider.rs

//! Record providers — the transport seam of the catalog.
//!
//! A [`RecordProvider`] performs one operation: fetch and decode the raw city
//! record collection from wherever it lives. The catalog never touches a
//! socket or the filesystem itself; it only sees `Vec<CityRecord>` or a
//! [`FetchError`].

use async_trait::async_trait;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{FetchError, Result};
use crate::model::CityRecord;

/// Upstream dataset used when no custom source is configured.
pub const DEFAULT_CITIES_URL: &str =
    "https://gist.githubusercontent.com/hernan-uala/dce8843a8edbe0b0018b32e137bc2b3a/raw/0996accf70cb0ca0e16f9a99e0ee185fafca7af1/cities.json";

/// Asynchronous source of raw city records.
#[async_trait]
pub trait RecordProvider: Send + Sync {
    /// Fetch and decode the full record collection.
    async fn fetch_records(&self) -> Result<Vec<CityRecord>>;
}

#[async_trait]
impl<P: RecordProvider + ?Sized> RecordProvider for Box<P> {
    async fn fetch_records(&self) -> Result<Vec<CityRecord>> {
        (**self).fetch_records().await
    }
}

/// Decode a JSON array of city records, skipping entries that do not match
/// the expected shape.
///
/// Only a payload that is not an array at all fails the whole load; a single
/// malformed element is logged and dropped.
pub(crate) fn decode_records(reader: impl Read) -> Result<Vec<CityRecord>> {
    let values: Vec<serde_json::Value> =
        serde_json::from_reader(reader).map_err(FetchError::decode)?;

    let total = values.len();
    let mut records = Vec::with_capacity(total);
    for value in values {
        match serde_json::from_value::<CityRecord>(value) {
            Ok(record) => records.push(record),
            Err(e) => log::warn!("skipping malformed city record: {e}"),
        }
    }
    if records.len() < total {
        log::warn!("dropped {} of {} city records", total - records.len(), total);
    }
    Ok(records)
}

// -----------------------------------------------------------------------------
// HTTP PROVIDER (feature = "fetch")
// -----------------------------------------------------------------------------

/// Fetches the dataset over HTTP.
///
/// Non-2xx responses become [`FetchError::Status`]; connection and body
/// failures become [`FetchError::Transport`].
#[cfg(feature = "fetch")]
pub struct HttpRecordProvider {
    client: reqwest::Client,
    url: String,
}

#[cfg(feature = "fetch")]
impl HttpRecordProvider {
    /// Provider pointed at [`DEFAULT_CITIES_URL`].
    pub fn new() -> Self {
        Self::with_url(DEFAULT_CITIES_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[cfg(feature = "fetch")]
impl Default for HttpRecordProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "fetch")]
#[async_trait]
impl RecordProvider for HttpRecordProvider {
    async fn fetch_records(&self) -> Result<Vec<CityRecord>> {
        log::debug!("fetching city records from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(FetchError::transport)?;
        decode_records(body.as_ref())
    }
}

// -----------------------------------------------------------------------------
// FILE PROVIDER
// -----------------------------------------------------------------------------

/// Reads the dataset from a local `cities.json` (or `cities.json.gz` with the
/// `compact` feature).
///
/// Useful for the CLI and for air-gapped setups; the read is small enough to
/// run inline on the calling task.
pub struct FileRecordProvider {
    path: PathBuf,
}

impl FileRecordProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the file, buffers it, and unwraps gzip when the extension says so.
    fn open_stream(&self) -> Result<Box<dyn Read>> {
        let file = std::fs::File::open(&self.path).map_err(FetchError::transport)?;
        let reader = std::io::BufReader::new(file);

        if self.path.extension().is_some_and(|ext| ext == "gz") {
            #[cfg(feature = "compact")]
            {
                return Ok(Box::new(flate2::read::GzDecoder::new(reader)));
            }
            #[cfg(not(feature = "compact"))]
            {
                return Err(FetchError::transport(std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "gzip dataset requires the 'compact' feature",
                )));
            }
        }

        Ok(Box::new(reader))
    }
}

#[async_trait]
impl RecordProvider for FileRecordProvider {
    async fn fetch_records(&self) -> Result<Vec<CityRecord>> {
        log::debug!("loading city records from {}", self.path.display());
        let reader = self.open_stream()?;
        decode_records(reader)
    }
}
