//! Data models for chat log analysis
//!
//! This module contains the data structures shared by the loader, the
//! aggregation queries, the NLP pipeline and the renderers.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the exported chat CSV, as written by the export tool
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    /// Record type; `1` marks a plain text message
    #[serde(rename = "Type")]
    pub record_type: i64,
    /// `1` when the exporting user sent the message, `0` otherwise
    #[serde(rename = "IsSender")]
    pub is_sender: i64,
    /// Message text
    #[serde(rename = "StrContent", default)]
    pub content: String,
    /// Local send time as text
    #[serde(rename = "StrTime")]
    pub time: String,
}

/// Who sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The user who exported the log
    SelfUser,
    /// The other side of the conversation
    Other,
}

impl Sender {
    /// Map the export's sender flag onto a sender
    #[must_use]
    pub const fn from_flag(flag: i64) -> Self {
        if flag == 1 {
            Self::SelfUser
        } else {
            Self::Other
        }
    }
}

/// A text message kept after preprocessing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Who sent it
    pub sender: Sender,
    /// Message text
    pub content: String,
    /// When it was sent
    pub timestamp: NaiveDateTime,
    /// Calendar date of `timestamp`
    pub date: NaiveDate,
}

impl Message {
    /// Build a message, deriving the date from the timestamp
    #[must_use]
    pub fn new(sender: Sender, content: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            sender,
            content: content.into(),
            timestamp,
            date: timestamp.date(),
        }
    }

    /// Hour of day, 0 through 23
    #[must_use]
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Day of week
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.timestamp.weekday()
    }

    /// Year-month period the message falls in
    #[must_use]
    pub fn year_month(&self) -> YearMonth {
        YearMonth::from_date(self.date)
    }
}

/// The cleaned message table every analysis step reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageTable {
    messages: Vec<Message>,
}

impl MessageTable {
    /// Wrap messages in file order
    #[must_use]
    pub const fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// All messages
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages sent by one side
    pub fn by_sender(&self, sender: Sender) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.sender == sender)
    }

    /// Number of messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when no message survived preprocessing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Earliest and latest message dates
    #[must_use]
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.messages.iter().map(|m| m.date).min()?;
        let last = self.messages.iter().map(|m| m.date).max()?;
        Some((first, last))
    }
}

/// A calendar month, printed as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    /// Calendar year
    pub year: i32,
    /// Month, 1 through 12
    pub month: u32,
}

impl YearMonth {
    /// The month containing `date`
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Ordered bucket counts produced by an aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyTable<K> {
    entries: Vec<(K, usize)>,
}

impl<K> FrequencyTable<K> {
    /// Wrap entries in their display order
    #[must_use]
    pub const fn new(entries: Vec<(K, usize)>) -> Self {
        Self { entries }
    }

    /// Entries in order
    #[must_use]
    pub fn entries(&self) -> &[(K, usize)] {
        &self.entries
    }

    /// Bucket keys in order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Bucket counts in order
    pub fn counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|(_, c)| *c)
    }

    /// Sum of all counts
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts().sum()
    }

    /// Number of buckets
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no buckets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest bucket; the first one wins a tie
    #[must_use]
    pub fn max_entry(&self) -> Option<&(K, usize)> {
        self.entries
            .iter()
            .fold(None, |best: Option<&(K, usize)>, entry| match best {
                Some(b) if b.1 >= entry.1 => Some(b),
                _ => Some(entry),
            })
    }

    /// Each bucket's share of the total, in percent
    #[must_use]
    pub fn percentages(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.entries.len()];
        }
        self.counts()
            .map(|c| c as f64 * 100.0 / total as f64)
            .collect()
    }
}
