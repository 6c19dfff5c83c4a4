//! Text reports: the peak-activity lines and the JSON summary.

use crate::aggregate::{
    daily_frequency, hourly_frequency, monthly_frequency, peak_activity, sender_counts,
    weekday_distribution, PeakActivity, SenderCounts,
};
use crate::error::{ChatStatsError, Result};
use crate::models::{FrequencyTable, MessageTable};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Display;
use std::io::Write;
use std::path::Path;

/// Write the two peak-activity lines
pub fn write_peak_activity<W: Write>(writer: &mut W, peaks: &PeakActivity) -> Result<()> {
    writeln!(
        writer,
        "Most active day: {}, with {} messages.",
        peaks.day.format("%Y-%m-%d"),
        peaks.day_count
    )?;
    writeln!(
        writer,
        "Most active month: {}, with {} messages.",
        peaks.month, peaks.month_count
    )?;
    Ok(())
}

/// Every aggregation of one export, for machine consumption
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_messages: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub senders: SenderCounts,
    pub peaks: PeakActivity,
    pub daily: FrequencyTable<String>,
    pub hourly: FrequencyTable<u32>,
    pub weekday: FrequencyTable<String>,
    pub monthly: FrequencyTable<String>,
    pub top_words: Vec<(String, usize)>,
}

impl Summary {
    /// Aggregate `table`; `top_words` comes from the word pipeline
    pub fn build(table: &MessageTable, top_words: Vec<(String, usize)>) -> Result<Self> {
        let peaks = peak_activity(table)?;
        let (first_date, last_date) = table.date_span().ok_or(ChatStatsError::EmptyDataset)?;

        Ok(Self {
            total_messages: table.len(),
            first_date,
            last_date,
            senders: sender_counts(table),
            peaks,
            daily: labelled(&daily_frequency(table)),
            hourly: hourly_frequency(table),
            weekday: labelled(&weekday_distribution(table)),
            monthly: labelled(&monthly_frequency(table)),
            top_words,
        })
    }
}

fn labelled<K: Display>(table: &FrequencyTable<K>) -> FrequencyTable<String> {
    FrequencyTable::new(
        table
            .entries()
            .iter()
            .map(|(k, c)| (k.to_string(), *c))
            .collect(),
    )
}

/// Write `summary` to `path` as pretty-printed JSON
pub fn write_summary(path: &Path, summary: &Summary) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
