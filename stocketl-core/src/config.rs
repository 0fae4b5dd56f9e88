//! Pipeline configuration.
//!
//! Resolution order: built-in defaults, then a TOML file, then the
//! `ALPHA_VANTAGE_API_KEY` environment variable. The CLI applies its flags
//! on top. The resolved value is passed explicitly into the provider and
//! loader for one run.

use crate::transform::DuplicatePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the Alpha Vantage credential.
pub const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "stocketl.toml";

/// Where the chart image goes unless configured otherwise.
pub const DEFAULT_CHART_PATH: &str = "outputs/closing_price_chart.svg";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no API key configured: set ALPHA_VANTAGE_API_KEY or `api_key` in the config file")]
    MissingApiKey,
}

/// Where raw series come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    AlphaVantage,
    Synthetic,
}

/// Everything one pipeline run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub symbol: String,
    pub source: SourceKind,
    pub base_url: String,
    /// Never serialized back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub processed_dir: PathBuf,
    pub chart_path: PathBuf,
    pub duplicates: DuplicatePolicy,
    pub write_parquet: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            symbol: crate::domain::DEFAULT_SYMBOL.to_string(),
            source: SourceKind::default(),
            base_url: crate::extract::DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: 60,
            processed_dir: PathBuf::from(crate::load::DEFAULT_PROCESSED_DIR),
            chart_path: PathBuf::from(DEFAULT_CHART_PATH),
            duplicates: DuplicatePolicy::default(),
            write_parquet: false,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Resolve the config for a run.
    ///
    /// An explicit `path` must exist. Without one, `stocketl.toml` in the
    /// working directory is used if present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// The environment credential wins over the file when set and non-empty.
    pub fn apply_env(&mut self, env_key: Option<String>) {
        if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
    }

    /// The API key, required for the Alpha Vantage source.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_paths() {
        let c = PipelineConfig::default();
        assert_eq!(c.symbol, "AAPL");
        assert_eq!(c.source, SourceKind::AlphaVantage);
        assert_eq!(c.processed_dir, PathBuf::from("data/processed"));
        assert_eq!(c.duplicates, DuplicatePolicy::Reject);
        assert!(c.api_key.is_none());
    }

    #[test]
    fn toml_overrides_selected_fields() {
        let c = PipelineConfig::from_toml(
            r#"
symbol = "MSFT"
source = "synthetic"
duplicates = "keep_last"
write_parquet = true
"#,
        )
        .unwrap();
        assert_eq!(c.symbol, "MSFT");
        assert_eq!(c.source, SourceKind::Synthetic);
        assert_eq!(c.duplicates, DuplicatePolicy::KeepLast);
        assert!(c.write_parquet);
        assert_eq!(c.timeout_secs, 60);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            PipelineConfig::from_toml("simbol = \"MSFT\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_key_overrides_file_key() {
        let mut c = PipelineConfig::from_toml("api_key = \"from-file\"").unwrap();
        c.apply_env(Some("from-env".into()));
        assert_eq!(c.require_api_key().unwrap(), "from-env");
    }

    #[test]
    fn blank_env_key_is_ignored() {
        let mut c = PipelineConfig::from_toml("api_key = \"from-file\"").unwrap();
        c.apply_env(Some("  ".into()));
        assert_eq!(c.require_api_key().unwrap(), "from-file");
    }

    #[test]
    fn missing_key_is_an_error() {
        let c = PipelineConfig::default();
        assert!(matches!(c.require_api_key(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn api_key_is_not_serialized() {
        let mut c = PipelineConfig::default();
        c.api_key = Some("secret".into());
        let text = toml::to_string(&c).unwrap();
        assert!(!text.contains("secret"));
    }

    #[test]
    fn missing_explicit_file_is_read_error() {
        let err = PipelineConfig::load(Some(Path::new("/nonexistent/stocketl.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
