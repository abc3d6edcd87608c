//! Deployment Configuration
//!
//! Handles loading and saving SHROUD configuration from TOML files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shroud_defi::PoolConfig;
use shroud_fhe::{BackendKind, FheConfig};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot encode config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("config not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("config selects the {} backend but {actual} was supplied", .configured.name())]
    BackendMismatch {
        configured: BackendKind,
        actual: &'static str,
    },
}

/// Full SHROUD configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShroudConfig {
    /// Substrate settings
    #[serde(default)]
    pub fhe: FheConfig,

    /// Pool fee settings
    #[serde(default)]
    pub pool: PoolConfig,

    /// Token metadata for the deployed pair
    #[serde(default)]
    pub token: TokenSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl ShroudConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        let io = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io)?;
        }
        fs::write(path, content).map_err(io)
    }

    /// Reject a backend other than the one `[fhe] backend` selects
    pub fn check_backend(&self, actual: &'static str) -> Result<(), ConfigError> {
        if self.fhe.backend.name() == actual {
            Ok(())
        } else {
            Err(ConfigError::BackendMismatch {
                configured: self.fhe.backend,
                actual,
            })
        }
    }

    /// Plaintext backend with verbose logging, for local runs and tests
    pub fn local() -> Self {
        Self {
            fhe: FheConfig {
                backend: BackendKind::Clear,
                ..Default::default()
            },
            logging: LoggingSettings {
                level: "debug".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fhe.security_bits < 128 {
            return Err(ConfigError::Invalid(format!(
                "security_bits must be at least 128, got {}",
                self.fhe.security_bits
            )));
        }

        self.pool
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        for (label, token) in [("token0", &self.token.token0), ("token1", &self.token.token1)] {
            if token.name.trim().is_empty() || token.symbol.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} needs a name and a symbol", label)));
            }
        }
        if self.token.token0.name == self.token.token1.name {
            return Err(ConfigError::Invalid(
                "token0 and token1 must have different names".to_string(),
            ));
        }

        Ok(())
    }
}

/// Name and symbol of one deployed token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
}

impl TokenInfo {
    fn new(name: &str, symbol: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

/// Token settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Decimals for both tokens
    pub decimals: u8,

    pub token0: TokenInfo,

    pub token1: TokenInfo,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            decimals: shroud_token::DEFAULT_DECIMALS,
            token0: TokenInfo::new("Zama", "ZAMA"),
            token1: TokenInfo::new("Kakarot", "KKRT"),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `shroud_defi=debug`
    pub level: String,

    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}
