//! Kiosk configuration loaded from TOML.
//!
//! The config file is selected via:
//! 1. an explicit path (the CLI's `--config <path>`)
//! 2. the `LECTOR_CONFIG` environment variable
//! 3. otherwise built-in defaults
//!
//! Every field has a default, so a partial file only overrides what it names:
//!
//! ```toml
//! [scanner]
//! facing_mode = "environment"
//! fps = 10
//! qrbox = { width = 250, height = 250 }
//!
//! [routes]
//! externo = "/accesoObservador"
//! computo = "/accesoComputo"
//!
//! [logging]
//! filter = "info"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use lector_core::{Error, Result, RouteTable};
use lector_hardware::ScanConstraints;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "LECTOR_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    pub scanner: ScanConstraints,
    pub routes: RouteTable,
    pub logging: LoggingConfig,
}

impl KioskConfig {
    /// Pick the config file path: `explicit` first, then `LECTOR_CONFIG`.
    pub fn resolve_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit.or_else(|| env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
    }

    /// Load the resolved config file, or defaults if none is named.
    pub fn load(explicit: Option<PathBuf>) -> Result<Self> {
        match Self::resolve_path(explicit) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the scanner or router cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.scanner.fps == 0 {
            return Err(Error::Config("scanner.fps must be greater than 0".to_string()));
        }
        if self.scanner.qrbox.width == 0 || self.scanner.qrbox.height == 0 {
            return Err(Error::Config("scanner.qrbox sides must be greater than 0".to_string()));
        }
        for (name, base) in [("externo", &self.routes.externo), ("computo", &self.routes.computo)] {
            if !base.starts_with('/') {
                return Err(Error::Config(format!(
                    "routes.{} must start with '/', got {:?}",
                    name, base
                )));
            }
        }
        Ok(())
    }
}
