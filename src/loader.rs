//! Loading the exported chat CSV into a [`MessageTable`].
//!
//! Only text records are kept; every kept record must carry a parseable
//! timestamp. Other record types (images, voice, system notices) are dropped
//! before their timestamps are looked at.

use crate::error::{ChatStatsError, Result};
use crate::models::{Message, MessageTable, RawRecord, Sender};
use chrono::NaiveDateTime;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Timestamp layouts accepted in the `StrTime` column, tried in order
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];

/// Read every record of the export at `path`
pub fn read_chat_records(path: &Path) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path)?;
    read_chat_records_from(file)
}

/// Read every record from any CSV source with a header row
pub fn read_chat_records_from<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let records = csv_reader
        .deserialize::<RawRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Parse a `StrTime` value
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| ChatStatsError::InvalidTimestamp {
            value: value.to_string(),
        })
}

/// Keep text records and turn them into messages
pub fn preprocess(records: Vec<RawRecord>, text_marker: i64) -> Result<MessageTable> {
    let messages = records
        .into_iter()
        .filter(|record| record.record_type == text_marker)
        .map(|record| {
            let timestamp = parse_timestamp(&record.time)?;
            Ok(Message::new(
                Sender::from_flag(record.is_sender),
                record.content,
                timestamp,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MessageTable::new(messages))
}

/// Load the export at `path` and keep its text messages
pub fn load_messages(path: &Path, text_marker: i64) -> Result<MessageTable> {
    debug!("Reading chat export from {}", path.display());
    let records = read_chat_records(path)?;
    let raw_count = records.len();

    let table = preprocess(records, text_marker)?;
    info!(
        raw_rows = raw_count,
        text_messages = table.len(),
        "Loaded chat export"
    );
    Ok(table)
}
