// Error types for the prompt pipeline.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PromptError>;

#[derive(Debug, Error)]
pub enum PromptError {
    /// The description was empty or whitespace only. Checked before any
    /// scoring so no styles are invented for blank input.
    #[error("description is empty")]
    EmptyDescription,

    /// A selected style (usually a configured default) is not in the lexicon.
    #[error("style '{0}' is not in the lexicon")]
    UnknownStyle(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("could not read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {path}: {source}")]
    ConfigJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A preference string that is not one of the accepted values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} preference '{value}'")]
pub struct UnknownPreference {
    pub kind: &'static str,
    pub value: String,
}
