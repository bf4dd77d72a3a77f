//! Daemon configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use offers_ledger::LedgerConfig;
use offers_types::OffersError;
use offers_utils::LogFormat;

/// Configuration for the `offers` binary.
///
/// Can be loaded from a TOML file via [`DaemonConfig::from_toml_file`];
/// command-line flags override individual fields afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in mebibytes.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    #[serde(default = "default_max_dbs")]
    pub max_dbs: u32,

    /// Optional key prefix isolating this ledger inside a shared data directory.
    #[serde(default)]
    pub namespace: Option<String>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub ledger: LedgerConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./offers_data")
}

fn default_map_size_mb() -> usize {
    64
}

fn default_max_dbs() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, OffersError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| OffersError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, OffersError> {
        toml::from_str(s).map_err(|e| OffersError::Config(e.to_string()))
    }

    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size_mb: default_map_size_mb(),
            max_dbs: default_max_dbs(),
            namespace: None,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            ledger: LedgerConfig::default(),
        }
    }
}
