use std::path::PathBuf;
use thiserror::Error;

use crate::wrapper::Ineligibility;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("No input file provided")]
    MissingInput,

    #[error("Cannot generate wrapper for {name}: {reason}")]
    Ineligible { name: String, reason: Ineligibility },
}

pub type Result<T> = std::result::Result<T, GenError>;

impl GenError {
    pub fn read_input(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::ReadInput {
            path: path.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        GenError::Config(message.into())
    }

    pub fn ineligible(name: impl Into<String>, reason: Ineligibility) -> Self {
        GenError::Ineligible {
            name: name.into(),
            reason,
        }
    }

    /// Errors the CLI reports as a plain stdout line rather than a trace.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, GenError::MissingInput | GenError::Ineligible { .. })
    }
}
