//! Chat Stats - Descriptive Statistics for Exported Chat Logs
//!
//! A Rust library for turning a chat export CSV into frequency charts, a
//! calendar heatmap, word-frequency charts and a word cloud.
//!
//! # Features
//!
//! - Load text messages from a chat export CSV
//! - Daily, hourly, weekday and monthly message counts
//! - Chinese word segmentation with stop-word filtering
//! - PNG charts rendered with plotters
//! - Peak-activity report and JSON summary

/// Group-by-count queries and peak activity
pub mod aggregate;
/// Configuration management
pub mod config;
/// Error types
pub mod error;
/// CSV loading and preprocessing
pub mod loader;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// NLP processing
pub mod nlp;
/// Step runner over a loaded export
pub mod pipeline;
/// Chart rendering
pub mod render;
/// Peak-activity lines and JSON summary
pub mod report;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use config::AppConfig;
pub use error::{ChatStatsError, Result};
pub use models::{FrequencyTable, Message, MessageTable, Sender};
pub use nlp::TextAnalyzer;
pub use pipeline::{Analyzer, Audience, Step};
