// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layered configuration: built-in defaults, an optional `flowctl.config.toml`,
//! environment variables, then CLI flags, each layer overriding the last.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "flowctl.config.toml";
const DEFAULT_WORKFLOW_FILE: &str = "flowctl.toml";
const DEFAULT_BACKEND: &str = "local";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },
    #[error("could not determine a default state directory; set FLOWCTL_STATE_DIR or --state-dir")]
    NoStateDir,
}

/// Optional fields read from `flowctl.config.toml`, if present.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    backend: Option<String>,
    state_dir: Option<PathBuf>,
    workflow_file: Option<PathBuf>,
}

impl ConfigFile {
    fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        Ok(Some(parsed))
    }
}

/// Resolved configuration for one CLI invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: String,
    pub state_dir: PathBuf,
    pub workflow_file: PathBuf,
}

/// CLI-flag overrides; `None` leaves the lower layer's value in place.
#[derive(Debug, Default)]
pub struct Overrides {
    pub backend: Option<String>,
    pub state_dir: Option<PathBuf>,
    pub workflow_file: Option<PathBuf>,
}

impl Config {
    /// Resolve configuration in ascending precedence: built-in defaults,
    /// `flowctl.config.toml` (if present in the current directory),
    /// environment variables, then `overrides`.
    pub fn load(overrides: Overrides) -> Result<Self, ConfigError> {
        let file = ConfigFile::load(Path::new(CONFIG_FILE_NAME))?.unwrap_or_default();

        let backend = overrides
            .backend
            .or_else(crate::env::default_backend)
            .or(file.backend)
            .unwrap_or_else(|| DEFAULT_BACKEND.to_string());

        let state_dir = overrides
            .state_dir
            .or_else(crate::env::default_state_dir)
            .or(file.state_dir)
            .ok_or(ConfigError::NoStateDir)?;

        let workflow_file = overrides
            .workflow_file
            .or(file.workflow_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKFLOW_FILE));

        Ok(Self {
            backend,
            state_dir,
            workflow_file,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
