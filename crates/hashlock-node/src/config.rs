//! Node configuration loading and management.

use chrono::{DateTime, TimeZone, Utc};
use hashlock_core::{Address, EscrowConfig, TokenAmount};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Full configuration for the Hashlock node.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HashlockConfig {
    /// API server settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Ledger clock settings.
    #[serde(default)]
    pub clock: ClockConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Escrow engine parameters.
    #[serde(default)]
    pub escrow: EscrowConfig,

    /// Balances credited when the ledger is first created.
    #[serde(default)]
    pub genesis: GenesisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API listen address.
    #[serde(default = "default_api_addr")]
    pub listen_addr: String,
    /// API port.
    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the data directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClockKind {
    /// Slot numbers counted from `genesis`.
    #[default]
    Slot,
    /// Milliseconds since the UNIX epoch.
    UnixMillis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    #[serde(default)]
    pub kind: ClockKind,
    /// Slot length for the `slot` clock.
    #[serde(default = "default_slot_duration_ms")]
    pub slot_duration_ms: u64,
    /// Instant of slot 0 for the `slot` clock.
    #[serde(default = "default_clock_genesis")]
    pub genesis: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenesisConfig {
    #[serde(default)]
    pub allocations: Vec<GenesisAllocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAllocation {
    pub owner: Address,
    /// Defaults to the native currency.
    #[serde(default)]
    pub mint: Address,
    pub amount: TokenAmount,
}

// Default value functions
fn default_api_addr() -> String {
    "127.0.0.1".into()
}
fn default_api_port() -> u16 {
    9101
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_slot_duration_ms() -> u64 {
    400
}
fn default_clock_genesis() -> DateTime<Utc> {
    Utc.timestamp_opt(1_704_067_200, 0)
        .single()
        .unwrap_or_default()
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_api_addr(),
            port: default_api_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            kind: ClockKind::default(),
            slot_duration_ms: default_slot_duration_ms(),
            genesis: default_clock_genesis(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl HashlockConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: HashlockConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn api_addr(&self) -> String {
        format!("{}:{}", self.api.listen_addr, self.api.port)
    }
}
