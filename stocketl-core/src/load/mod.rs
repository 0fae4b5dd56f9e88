//! Loading: persist an enriched series to disk.
//!
//! Layout under the output directory (default `data/processed`):
//! - `{SYMBOL}_daily.csv`: the processed table
//! - `{SYMBOL}_daily.meta.json`: sidecar (date range, row count, hash, source)
//! - `{SYMBOL}_daily.parquet`: optional columnar copy
//!
//! Existing files are overwritten. Writes go to `.tmp` then rename into
//! place, so a reader never sees a half-written CSV.

pub mod csv_format;
pub mod meta;
pub mod parquet;

use crate::domain::EnrichedSeries;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub use csv_format::{read_records, to_csv_bytes, write_records, CSV_HEADER};
pub use meta::LoadMeta;

/// Default directory for processed output.
pub const DEFAULT_PROCESSED_DIR: &str = "data/processed";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unexpected CSV header: {found}")]
    Header { found: String },

    #[error("metadata serialization: {0}")]
    Meta(#[from] serde_json::Error),

    #[error("parquet error: {0}")]
    Parquet(String),
}

impl LoadError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Paths produced by one successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub csv_path: PathBuf,
    pub meta_path: PathBuf,
    pub parquet_path: Option<PathBuf>,
    pub rows: usize,
}

/// Writes processed series under a fixed directory.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    output_dir: PathBuf,
    write_parquet: bool,
}

impl CsvLoader {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            write_parquet: false,
        }
    }

    /// Also write `{SYMBOL}_daily.parquet`.
    pub fn with_parquet(mut self, enabled: bool) -> Self {
        self.write_parquet = enabled;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `{output_dir}/{symbol}_daily.csv`
    pub fn csv_path(&self, symbol: &str) -> PathBuf {
        self.output_dir.join(format!("{symbol}_daily.csv"))
    }

    /// `{output_dir}/{symbol}_daily.meta.json`
    pub fn meta_path(&self, symbol: &str) -> PathBuf {
        self.output_dir.join(format!("{symbol}_daily.meta.json"))
    }

    /// `{output_dir}/{symbol}_daily.parquet`
    pub fn parquet_path(&self, symbol: &str) -> PathBuf {
        self.output_dir.join(format!("{symbol}_daily.parquet"))
    }

    /// Write the series, creating the output directory if needed.
    ///
    /// `source` is the provider name recorded in the sidecar.
    pub fn write(&self, series: &EnrichedSeries, source: &str) -> Result<LoadOutcome, LoadError> {
        fs::create_dir_all(&self.output_dir).map_err(|e| LoadError::io(&self.output_dir, e))?;

        let csv_path = self.csv_path(&series.symbol);
        let bytes = to_csv_bytes(&series.records)?;
        write_atomic(&csv_path, &bytes)?;

        let meta = LoadMeta::describe(series, &bytes, source);
        let meta_path = self.meta_path(&series.symbol);
        write_atomic(&meta_path, serde_json::to_string_pretty(&meta)?.as_bytes())?;

        let parquet_path = if self.write_parquet {
            let path = self.parquet_path(&series.symbol);
            parquet::write_parquet(&path, &series.records)?;
            Some(path)
        } else {
            None
        };

        info!(
            symbol = %series.symbol,
            rows = series.len(),
            path = %csv_path.display(),
            "saved processed data to {}",
            csv_path.display()
        );

        Ok(LoadOutcome {
            csv_path,
            meta_path,
            parquet_path,
            rows: series.len(),
        })
    }

    /// Read a processed CSV back into a series.
    pub fn read(&self, symbol: &str) -> Result<EnrichedSeries, LoadError> {
        let path = self.csv_path(symbol);
        let file = fs::File::open(&path).map_err(|e| LoadError::io(&path, e))?;
        Ok(EnrichedSeries {
            symbol: symbol.to_string(),
            records: read_records(file)?,
        })
    }

    /// The sidecar for a symbol, if present and parseable.
    pub fn read_meta(&self, symbol: &str) -> Option<LoadMeta> {
        let content = fs::read_to_string(self.meta_path(symbol)).ok()?;
        serde_json::from_str(&content).ok()
    }
}

/// Parse a processed CSV at an arbitrary path.
///
/// The symbol is taken from a `{SYMBOL}_daily.csv` file name, else the file
/// stem as-is.
pub fn read_processed_csv(path: &Path) -> Result<EnrichedSeries, LoadError> {
    let file = fs::File::open(path).map_err(|e| LoadError::io(path, e))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let symbol = stem.strip_suffix("_daily").unwrap_or(&stem).to_string();
    Ok(EnrichedSeries {
        symbol,
        records: read_records(file)?,
    })
}

/// Write to `{path}.tmp`, then rename over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), LoadError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, bytes).map_err(|e| LoadError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        LoadError::io(path, e)
    })
}
