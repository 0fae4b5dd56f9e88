//! StockETL Core: domain types, extraction, transformation, loading.
//!
//! This crate contains the whole data path of the pipeline:
//! - Raw and enriched daily record types
//! - Providers (Alpha Vantage over HTTP, seeded synthetic)
//! - The transformer: parse, validate, sort, then derive returns,
//!   volatility, moving averages and day type
//! - CSV loader with metadata sidecar and optional Parquet copy
//! - Config resolution and the pipeline runner

pub mod config;
pub mod domain;
pub mod extract;
pub mod load;
pub mod pipeline;
pub mod transform;

pub use config::{ConfigError, PipelineConfig, SourceKind};
pub use domain::{DailyRecord, DayType, EnrichedRecord, EnrichedSeries, RawRecord, RawSeries};
pub use extract::{ExtractError, SeriesProvider};
pub use load::{read_processed_csv, CsvLoader, LoadError, LoadMeta, LoadOutcome};
pub use pipeline::{run_from_config, run_pipeline, PipelineError, PipelineReport};
pub use transform::{transform, DuplicatePolicy, TransformError};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn domain_types_are_send_sync() {
        assert_send::<RawSeries>();
        assert_sync::<RawSeries>();
        assert_send::<EnrichedSeries>();
        assert_sync::<EnrichedSeries>();
        assert_send::<DayType>();
        assert_sync::<DayType>();
    }

    #[test]
    fn config_and_loader_are_send_sync() {
        assert_send::<PipelineConfig>();
        assert_sync::<PipelineConfig>();
        assert_send::<CsvLoader>();
        assert_sync::<CsvLoader>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<PipelineError>();
        assert_sync::<PipelineError>();
    }
}
