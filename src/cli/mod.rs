//! CLI support for mql-pipeline
//!
//! Provides programmatic access to the `mql` commands so they can be
//! embedded in other tools.

mod coerce;
mod render;

pub use coerce::{CoerceResult, execute_coerce};
pub use render::{RenderOptions, execute_render, pipeline_from_json};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Rendering error
    Render(crate::MqlError),
    /// JSON parsing error
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
    /// No input provided
    NoInput,
    /// Input is not an array of single-key stage documents
    InvalidStage(String),
    /// Stage keyword the builder does not know
    UnknownStage(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Render(e) => write!(f, "{}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => write!(f, "No input provided. Use --input or pipe JSON to stdin."),
            CliError::InvalidStage(msg) => write!(f, "Invalid stage: {}", msg),
            CliError::UnknownStage(keyword) => write!(f, "Unknown stage keyword: '{}'", keyword),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Render(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::MqlError> for CliError {
    fn from(e: crate::MqlError) -> Self {
        CliError::Render(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
