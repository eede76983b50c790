//! Environment Configuration
//!
//! Both binaries read their settings from environment variables (optionally
//! seeded from a `.env` file). Defaults mirror the local development layout:
//! reports under `data/reports`, tier output under `data/target_marketing`.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems are fatal and reported before any work starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Load `.env` from the working directory if one exists.
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }
}

// ============================================================================
// Target marketing
// ============================================================================

/// Remote data store credentials.
#[derive(Debug, Clone)]
pub struct DataStoreConfig {
    pub url: String,
    pub api_key: String,
    pub table: String,
}

/// Where the company records come from.
#[derive(Debug, Clone)]
pub enum RecordSourceConfig {
    /// PostgREST endpoint of the hosted data store
    Remote(DataStoreConfig),
    /// Exported JSON array of company rows
    File(PathBuf),
}

/// Settings for the `target_marketing` binary.
#[derive(Debug, Clone)]
pub struct TargetingConfig {
    pub source: RecordSourceConfig,
    pub output_dir: PathBuf,
    /// Custom weight table; `None` uses the embedded one
    pub weights_path: Option<PathBuf>,
}

impl TargetingConfig {
    pub const DEFAULT_OUTPUT_DIR: &'static str = "data/target_marketing";
    pub const DEFAULT_TABLE: &'static str = "kotra";

    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let source = match get("TARGETING_SOURCE_FILE") {
            Some(path) => RecordSourceConfig::File(PathBuf::from(path)),
            None => {
                let url = get("SUPABASE_URL")
                    .or_else(|| get("VITE_SUPABASE_URL"))
                    .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
                let api_key = get("SUPABASE_KEY")
                    .or_else(|| get("VITE_SUPABASE_KEY"))
                    .ok_or(ConfigError::Missing("SUPABASE_KEY"))?;

                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::Invalid { name: "SUPABASE_URL", value: url });
                }

                RecordSourceConfig::Remote(DataStoreConfig {
                    url: url.trim_end_matches('/').to_string(),
                    api_key,
                    table: get("TARGETING_TABLE").unwrap_or_else(|| Self::DEFAULT_TABLE.to_string()),
                })
            }
        };

        Ok(Self {
            source,
            output_dir: PathBuf::from(
                get("TARGETING_OUTPUT_DIR").unwrap_or_else(|| Self::DEFAULT_OUTPUT_DIR.to_string()),
            ),
            weights_path: get("TIER_WEIGHTS_PATH").map(PathBuf::from),
        })
    }
}

// ============================================================================
// Report server
// ============================================================================

/// Settings for the `report_server` binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub reports_dir: PathBuf,
    pub port: u16,
    /// Prefix for generated links when served behind a proxy path
    pub base_path: String,
}

impl ServerConfig {
    pub const DEFAULT_REPORTS_DIR: &'static str = "data/reports";
    pub const DEFAULT_PORT: u16 = 3000;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value: raw })?,
            None => Self::DEFAULT_PORT,
        };

        Ok(Self {
            reports_dir: PathBuf::from(
                lookup("REPORTS_DIR").unwrap_or_else(|| Self::DEFAULT_REPORTS_DIR.to_string()),
            ),
            port,
            base_path: lookup("BASE_PATH")
                .map(|p| p.trim_end_matches('/').to_string())
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_credentials_is_fatal() {
        let err = TargetingConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SUPABASE_URL")));

        let err = TargetingConfig::from_lookup(lookup_from(&[("SUPABASE_URL", "https://x.supabase.co")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SUPABASE_KEY")));
    }

    #[test]
    fn test_vite_prefixed_credentials_accepted() {
        let config = TargetingConfig::from_lookup(lookup_from(&[
            ("VITE_SUPABASE_URL", "https://x.supabase.co/"),
            ("VITE_SUPABASE_KEY", "anon"),
        ]))
        .unwrap();

        match config.source {
            RecordSourceConfig::Remote(store) => {
                assert_eq!(store.url, "https://x.supabase.co");
                assert_eq!(store.api_key, "anon");
                assert_eq!(store.table, "kotra");
            }
            other => panic!("expected remote source, got {:?}", other),
        }
        assert_eq!(config.output_dir, PathBuf::from("data/target_marketing"));
        assert!(config.weights_path.is_none());
    }

    #[test]
    fn test_source_file_skips_credentials() {
        let config = TargetingConfig::from_lookup(lookup_from(&[
            ("TARGETING_SOURCE_FILE", "export.json"),
            ("TARGETING_OUTPUT_DIR", "/tmp/out"),
        ]))
        .unwrap();
        assert!(matches!(config.source, RecordSourceConfig::File(_)));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let err = TargetingConfig::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "  "),
            ("SUPABASE_KEY", "k"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SUPABASE_URL")));
    }

    #[test]
    fn test_server_config_defaults_and_port() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.reports_dir, PathBuf::from("data/reports"));

        let err = ServerConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }
}
