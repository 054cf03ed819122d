//! Error types shared by the library.
//!
//! Data problems (unreadable files, bad JSON, failing jq filters) and tree
//! invariant violations both surface here; inference itself never fails.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON ({origin}): {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("at JSON path {path} → {message}")]
    JsonPath { path: String, message: String },

    #[error("JSON pointer {pointer} selected nothing in {origin}")]
    JsonPointer { pointer: String, origin: String },

    #[error("jq filter failed: {0}")]
    Jq(String),

    #[error("invalid input pattern: {0}")]
    Glob(String),

    /// A node tree that breaks the renderer's invariants. Trees built by
    /// [`crate::inference::Inference`] never trigger this; hand-edited dumps can.
    #[error("invalid node tree at {path}: {reason}")]
    InvalidTree { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<glob::PatternError> for Error {
    fn from(error: glob::PatternError) -> Self {
        Error::Glob(error.to_string())
    }
}

impl From<glob::GlobError> for Error {
    fn from(error: glob::GlobError) -> Self {
        Error::Glob(error.to_string())
    }
}
