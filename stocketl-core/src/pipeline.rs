//! Pipeline runner: wires extract, transform and load for one symbol.
//!
//! Two entry points:
//! - `run_pipeline()`: explicit provider and loader. Used by tests.
//! - `run_from_config()`: builds both from a resolved `PipelineConfig`. Used by the CLI.
//!
//! Nothing is written unless extraction and transformation both succeed,
//! and an empty raw series counts as an extraction failure.

use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, PipelineConfig, SourceKind};
use crate::domain::EnrichedSeries;
use crate::extract::{AlphaVantageProvider, ExtractError, SeriesProvider, SyntheticProvider};
use crate::load::{CsvLoader, LoadError, LoadOutcome};
use crate::transform::{transform, DuplicatePolicy, TransformError};

/// Errors from a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("extract error: {0}")]
    Extract(#[from] ExtractError),
    #[error("transform error: {0}")]
    Transform(#[from] TransformError),
    #[error("load error: {0}")]
    Load(#[from] LoadError),
}

impl PipelineError {
    /// The response did not contain a daily series.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, PipelineError::Extract(e) if e.is_data_unavailable())
    }

    /// A record could not be parsed into a typed daily record.
    pub fn is_malformed_record(&self) -> bool {
        matches!(self, PipelineError::Transform(e) if e.is_malformed_record())
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub series: EnrichedSeries,
    pub outcome: LoadOutcome,
    /// Name of the provider that produced the raw series.
    pub source: String,
}

/// Fetch, enrich and persist one symbol.
pub fn run_pipeline(
    provider: &dyn SeriesProvider,
    loader: &CsvLoader,
    symbol: &str,
    policy: DuplicatePolicy,
) -> Result<PipelineReport, PipelineError> {
    info!(symbol, provider = provider.name(), "extracting daily series");
    let raw = provider.fetch(symbol)?;
    if raw.is_empty() {
        return Err(ExtractError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: "empty time series".to_string(),
            payload: String::new(),
        }
        .into());
    }

    let series = transform(raw, policy)?;
    let outcome = loader.write(&series, provider.name())?;

    Ok(PipelineReport {
        series,
        outcome,
        source: provider.name().to_string(),
    })
}

/// Build the provider selected by `config.source`.
///
/// The Alpha Vantage source needs an API key; the synthetic one does not.
pub fn provider_from_config(
    config: &PipelineConfig,
) -> Result<Box<dyn SeriesProvider>, PipelineError> {
    match config.source {
        SourceKind::AlphaVantage => {
            let key = config.require_api_key()?;
            let provider = AlphaVantageProvider::new(&config.base_url, key, config.timeout())?;
            Ok(Box::new(provider))
        }
        SourceKind::Synthetic => Ok(Box::new(SyntheticProvider::ending_today())),
    }
}

/// Loader for `config.processed_dir`, honouring `write_parquet`.
pub fn loader_from_config(config: &PipelineConfig) -> CsvLoader {
    CsvLoader::new(&config.processed_dir).with_parquet(config.write_parquet)
}

/// Run the pipeline for `config.symbol`.
pub fn run_from_config(config: &PipelineConfig) -> Result<PipelineReport, PipelineError> {
    let provider = provider_from_config(config)?;
    let loader = loader_from_config(config);
    run_pipeline(provider.as_ref(), &loader, &config.symbol, config.duplicates)
}
