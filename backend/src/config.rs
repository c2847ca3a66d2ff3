//! Configuration loading.
//!
//! Resolution order: an explicit path, then `$PROCMAN_CONFIG`, then
//! `<config dir>/procman/config.toml`, then built-in defaults.
//! `$PROCMAN_PROC_ROOT` overrides `proc_root` afterwards.

use crate::process_list::DEFAULT_PROC_ROOT;
use crate::signals::parse_signal;
use crate::types::{ProcError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_ENV: &str = "PROCMAN_CONFIG";
pub const PROC_ROOT_ENV: &str = "PROCMAN_PROC_ROOT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Mount point of the process hierarchy.
    pub proc_root: PathBuf,
    /// Signal sent by bulk kills when the caller names none.
    pub default_signal: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            default_signal: "SIGTERM".to_string(),
        }
    }
}

impl Config {
    /// Load with the full resolution order described in the module docs.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        if let Some(root) = std::env::var_os(PROC_ROOT_ENV) {
            config.proc_root = PathBuf::from(root);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let text = std::fs::read_to_string(path)
            .map_err(|e| ProcError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&text).map_err(|e| match e {
            ProcError::Config(msg) => ProcError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| ProcError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("procman").join("config.toml"))
    }

    /// Numeric value of `default_signal`.
    pub fn default_signal_number(&self) -> Result<i32> {
        parse_signal(&self.default_signal)
    }

    fn validate(&self) -> Result<()> {
        if self.proc_root.as_os_str().is_empty() {
            return Err(ProcError::Config("proc_root must not be empty".to_string()));
        }
        self.default_signal_number()
            .map_err(|e| ProcError::Config(format!("default_signal: {e}")))?;
        Ok(())
    }
}
