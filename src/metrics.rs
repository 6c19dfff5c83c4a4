use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Metric names
pub const ROWS_LOADED: &str = "chat_stats_rows_loaded_total";
pub const MESSAGES_KEPT: &str = "chat_stats_messages_kept_total";
pub const TOKENS_PRODUCED: &str = "chat_stats_tokens_produced_total";
pub const CHARTS_RENDERED: &str = "chat_stats_charts_rendered_total";
pub const STEP_DURATION: &str = "chat_stats_step_duration_seconds";
pub const STEPS_SKIPPED: &str = "chat_stats_steps_skipped_total";
pub const ERRORS_TOTAL: &str = "chat_stats_errors_total";
pub const STOP_WORDS: &str = "chat_stats_stop_words";

/// Run metrics: forwarded to the `metrics` facade and tallied locally
///
/// No recorder is installed by this crate, so the facade calls are no-ops
/// unless an embedding program installs one. The local tallies back the
/// end-of-run log line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunMetrics {
    pub messages_kept: u64,
    pub tokens_produced: u64,
    pub charts_rendered: u64,
    pub steps_skipped: u64,
    pub errors_total: u64,
}

impl RunMetrics {
    /// Record the outcome of loading the export
    pub fn record_load(&mut self, raw_rows: usize, kept: usize) {
        counter!(ROWS_LOADED).increment(raw_rows as u64);
        counter!(MESSAGES_KEPT).increment(kept as u64);
        self.messages_kept += kept as u64;
    }

    /// Record the size of the loaded stop-word list
    pub fn record_stop_words(&self, count: usize) {
        gauge!(STOP_WORDS).set(count as f64);
    }

    /// Record tokens produced for one audience
    pub fn record_tokens(&mut self, audience: &'static str, count: usize) {
        counter!(TOKENS_PRODUCED, "audience" => audience).increment(count as u64);
        self.tokens_produced += count as u64;
    }

    /// Record a finished step
    pub fn record_step(&mut self, step: &'static str, duration: Duration, charts: usize) {
        histogram!(STEP_DURATION, "step" => step).record(duration.as_secs_f64());
        counter!(CHARTS_RENDERED, "step" => step).increment(charts as u64);
        self.charts_rendered += charts as u64;
    }

    /// Record a step that had nothing to draw
    pub fn record_skip(&mut self, step: &'static str) {
        counter!(STEPS_SKIPPED, "step" => step).increment(1);
        self.steps_skipped += 1;
    }

    /// Record an error
    pub fn record_error(&mut self, step: &'static str) {
        counter!(ERRORS_TOTAL, "step" => step).increment(1);
        self.errors_total += 1;
    }
}
