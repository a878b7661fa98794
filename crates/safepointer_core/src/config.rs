//! Demo configuration.
//!
//! # Responsibility
//! - Describe the tracked entity and its self-destruct timing.
//! - Load overrides from JSON files.
//!
//! # Invariants
//! - A validated config always has a non-blank name and a non-empty delay
//!   range.

use crate::runtime::delay::{DelaySource, RandomDelay, DEFAULT_MAX_DELAY_MS};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Name given to the tracked entity unless configured otherwise.
pub const DEFAULT_ENTITY_NAME: &str = "Self Destructing Object";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    pub entity_name: String,
    /// Exclusive upper bound of the self-destruct delay.
    pub max_delay_ms: u64,
    /// Fixed RNG seed; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            entity_name: DEFAULT_ENTITY_NAME.to_string(),
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            seed: None,
        }
    }
}

impl DemoConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entity_name.trim().is_empty() {
            return Err(ConfigError::BlankEntityName);
        }
        if self.max_delay_ms == 0 {
            return Err(ConfigError::EmptyDelayRange);
        }
        Ok(())
    }

    /// Builds the delay source described by this config.
    pub fn delay_source(&self) -> Result<Box<dyn DelaySource>, ConfigError> {
        self.validate()?;
        let source = match self.seed {
            Some(seed) => RandomDelay::seeded(seed, self.max_delay_ms),
            None => RandomDelay::new(self.max_delay_ms),
        }
        .map_err(|_| ConfigError::EmptyDelayRange)?;
        Ok(Box::new(source))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    BlankEntityName,
    EmptyDelayRange,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "invalid config json: {err}"),
            Self::BlankEntityName => write!(f, "entity_name cannot be blank"),
            Self::EmptyDelayRange => write!(f, "max_delay_ms must be > 0"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::BlankEntityName | Self::EmptyDelayRange => None,
        }
    }
}
