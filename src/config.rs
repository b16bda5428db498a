use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::solve::{BranchingPolicy, SolverConfig};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    #[default]
    #[value(name = "utf8")]
    Utf8,
    /// Big endian with a byte order mark.
    #[value(name = "utf16")]
    Utf16,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed configuration file {path:?}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime settings, read from a JSON file. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub format: OutputFormat,
    pub encoding: Encoding,
    /// Print the parsed premises ahead of the models.
    pub echo_input: bool,
    pub branching: BranchingPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            encoding: Encoding::Utf8,
            echo_input: true,
            branching: BranchingPolicy::SignTable,
        }
    }
}

impl Config {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        Self::from_json(&s).map_err(|source| ConfigError::Decode {
            path: path.to_owned(),
            source,
        })
    }

    pub fn solver(&self) -> SolverConfig {
        SolverConfig {
            branching: self.branching,
        }
    }
}
