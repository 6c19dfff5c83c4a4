//! Error types for the chat-stats library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the chat-stats application.
#[derive(Error, Debug)]
pub enum ChatStatsError {
    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A required input file is absent or not a regular file
    #[error("{kind} not found: {}", path.display())]
    MissingFile {
        /// What the file is used for (input CSV, stop-word list, font)
        kind: &'static str,
        /// The configured path
        path: PathBuf,
    },

    /// Timestamp text that matches none of the accepted formats
    #[error("Invalid timestamp: {value}")]
    InvalidTimestamp {
        /// The raw timestamp text
        value: String,
    },

    /// No text messages survived preprocessing
    #[error("No text messages to analyze")]
    EmptyDataset,

    /// Chart drawing errors
    #[error("Render error: {0}")]
    Render(String),

    /// Font loading or registration errors
    #[error("Font error: {0}")]
    Font(String),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with `ChatStatsError`
pub type Result<T> = std::result::Result<T, ChatStatsError>;

impl From<anyhow::Error> for ChatStatsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl<E: std::error::Error + Send + Sync> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for ChatStatsError
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Self::Render(err.to_string())
    }
}
