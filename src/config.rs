//! TOML configuration for the canopy-sim service.
//!
//! Layered model: an explicit path, then the `CANOPY_SIM_CONFIG` environment
//! variable, then the standard system location, then compiled-in defaults.
//! Missing sections and keys fall back to their defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Environment variable naming a config file to load.
pub const CONFIG_ENV: &str = "CANOPY_SIM_CONFIG";

/// Standard system location for the config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/canopy-sim/canopy-sim.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for the service process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Load configuration from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        info!(path = %path.display(), "loaded service configuration");
        Ok(config)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit `path` must load; an unreadable one is an error. The
    /// environment variable and system file are best-effort.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        Ok(Self::load_or_default())
    }

    /// Try `CANOPY_SIM_CONFIG`, then the system path, then defaults.
    pub fn load_or_default() -> Self {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut candidates: Vec<&Path> = env_path.iter().map(PathBuf::as_path).collect();
        candidates.push(Path::new(SYSTEM_CONFIG_PATH));
        Self::load_first(&candidates)
    }

    /// Load the first candidate that exists and parses.
    ///
    /// A candidate that exists but cannot be loaded is logged and skipped.
    pub fn load_first(candidates: &[&Path]) -> Self {
        for path in candidates {
            if !path.exists() {
                debug!(path = %path.display(), "config candidate not found");
                continue;
            }
            match Self::load(path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %format!("{e:#}"),
                        "config file could not be loaded, trying fallback"
                    );
                }
            }
        }

        debug!("no usable config file found, using compiled-in defaults");
        Self::default()
    }

    /// Render as TOML, for `show-config`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Address and port the telemetry endpoint listens on.
    pub listen_address: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:8383".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Log output configuration. `RUST_LOG` overrides `level` when set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum tracing level (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
