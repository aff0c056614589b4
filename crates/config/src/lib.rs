#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for rtdist
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/rtdist/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

mod fetch;

pub use fetch::FetchOptions;

use rtdist_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
///
/// Every field is optional; an absent value means "not set" and leaves the
/// decision to a lower layer or to the fetcher's own defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Directory where downloaded archives are cached
    pub cache: Option<PathBuf>,

    /// Reject mirrors with invalid TLS certificates
    pub strict_ssl: Option<bool>,

    /// Per-download overrides handed to the fetcher
    pub dist_download: Option<FetchOptions>,

    /// Deprecated alias of `dist-download`
    pub download: Option<FetchOptions>,

    /// Use an already unpacked distribution instead of downloading one
    pub dist_dir: Option<PathBuf>,

    #[serde(default)]
    pub extract: ExtractConfig,

    #[serde(default)]
    pub network: NetworkConfig,
}

/// Archive extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtractConfig {
    #[serde(default = "default_extract_program")]
    pub program: PathBuf,
    /// Ask the extractor for verbose output
    #[serde(default)]
    pub debug: bool,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            program: default_extract_program(),
            debug: false,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: 300, // 5 minutes
            connect_timeout: 30,
        }
    }
}

fn default_extract_program() -> PathBuf {
    PathBuf::from("7za")
}

fn default_timeout() -> u64 {
    300 // 5 minutes
}

fn default_connect_timeout() -> u64 {
    30
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("rtdist").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML document
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML or a field has the
    /// wrong type.
    pub fn from_toml(contents: &str) -> Result<Self, Error> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // RTDIST_CACHE
        if let Ok(cache) = std::env::var("RTDIST_CACHE") {
            self.cache = Some(PathBuf::from(cache));
        }

        // RTDIST_STRICT_SSL
        if let Ok(strict) = std::env::var("RTDIST_STRICT_SSL") {
            self.strict_ssl = Some(parse_bool("RTDIST_STRICT_SSL", strict)?);
        }

        // RTDIST_DIST_DIR
        if let Ok(dist) = std::env::var("RTDIST_DIST_DIR") {
            self.dist_dir = Some(PathBuf::from(dist));
        }

        // RTDIST_7ZA
        if let Ok(program) = std::env::var("RTDIST_7ZA") {
            self.extract.program = PathBuf::from(program);
        }

        // RTDIST_DEBUG_7Z
        if let Ok(debug) = std::env::var("RTDIST_DEBUG_7Z") {
            self.extract.debug = parse_bool("RTDIST_DEBUG_7Z", debug)?;
        }

        Ok(())
    }

    /// Download overrides in effect, preferring `dist-download` over the
    /// deprecated `download` block.
    #[must_use]
    pub fn download_overrides(&self) -> Option<&FetchOptions> {
        self.dist_download.as_ref().or(self.download.as_ref())
    }
}

fn parse_bool(field: &str, value: String) -> Result<bool, Error> {
    match value.as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        }
        .into()),
    }
}
