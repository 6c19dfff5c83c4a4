use crate::error::{ChatStatsError, Result};
use std::path::Path;

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate that a required input file exists and is a regular file
    ///
    /// `kind` names the file in the error, e.g. "Chat export".
    pub fn validate_input_file(kind: &'static str, path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() || !path.is_file() {
            return Err(ChatStatsError::MissingFile {
                kind,
                path: path.to_path_buf(),
            });
        }

        // Check file permissions (readable)
        std::fs::File::open(path)?;

        Ok(())
    }

    /// Validate the output directory path
    ///
    /// The directory may not exist yet, but the path must not name a file.
    pub fn validate_output_dir(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(ChatStatsError::InvalidConfig(
                "Output directory cannot be empty".to_string(),
            ));
        }

        if path.is_file() {
            return Err(ChatStatsError::InvalidConfig(format!(
                "Output directory is a file: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Validate a sender label shown on charts
    pub fn validate_label(label: &str) -> Result<()> {
        if label.trim().is_empty() {
            return Err(ChatStatsError::InvalidConfig(
                "Sender label cannot be empty".to_string(),
            ));
        }

        if label.chars().count() > 100 {
            return Err(ChatStatsError::InvalidConfig(
                "Sender label too long (max 100 characters)".to_string(),
            ));
        }

        // Check for potentially dangerous characters
        if label.chars().any(char::is_control) {
            return Err(ChatStatsError::InvalidConfig(
                "Sender label contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate a top-N word limit
    pub fn validate_limit(limit: usize) -> Result<()> {
        if limit == 0 {
            return Err(ChatStatsError::InvalidConfig(
                "Word limit must be greater than 0".to_string(),
            ));
        }

        if limit > 10_000 {
            return Err(ChatStatsError::InvalidConfig(
                "Word limit too large (max 10,000)".to_string(),
            ));
        }

        Ok(())
    }
}
