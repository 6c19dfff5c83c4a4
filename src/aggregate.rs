//! Group-by-count queries over the message table.
//!
//! Every query goes through [`count_by`]: a key selector turns each message
//! into a bucket, buckets are counted and returned in ascending key order.
//! Queries with a fixed domain (hours, weekdays) zero-fill missing buckets.

use crate::error::{ChatStatsError, Result};
use crate::models::{FrequencyTable, Message, MessageTable, Sender, YearMonth};
use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

/// Weekdays in display order
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Count messages per key, ascending by key
pub fn count_by<'a, K, I, F>(messages: I, key: F) -> FrequencyTable<K>
where
    K: Ord,
    I: IntoIterator<Item = &'a Message>,
    F: Fn(&Message) -> K,
{
    let mut buckets: BTreeMap<K, usize> = BTreeMap::new();
    for message in messages {
        *buckets.entry(key(message)).or_insert(0) += 1;
    }
    FrequencyTable::new(buckets.into_iter().collect())
}

/// Messages per calendar date, only dates that have messages
#[must_use]
pub fn daily_frequency(table: &MessageTable) -> FrequencyTable<NaiveDate> {
    count_by(table.messages(), |m| m.date)
}

/// Messages per hour of day, all 24 hours
#[must_use]
pub fn hourly_frequency(table: &MessageTable) -> FrequencyTable<u32> {
    let counted = count_by(table.messages(), Message::hour);
    let mut hours = [0usize; 24];
    for (hour, count) in counted.entries() {
        hours[*hour as usize] = *count;
    }
    FrequencyTable::new((0u32..24).zip(hours).collect())
}

/// Messages per weekday, Monday through Sunday
#[must_use]
pub fn weekday_distribution(table: &MessageTable) -> FrequencyTable<Weekday> {
    let counted = count_by(table.messages(), |m| m.weekday().num_days_from_monday());
    let mut days = [0usize; 7];
    for (day, count) in counted.entries() {
        days[*day as usize] = *count;
    }
    FrequencyTable::new(WEEKDAYS.into_iter().zip(days).collect())
}

/// Messages per calendar month
#[must_use]
pub fn monthly_frequency(table: &MessageTable) -> FrequencyTable<YearMonth> {
    count_by(table.messages(), Message::year_month)
}

/// Messages sent by each side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SenderCounts {
    /// Sent by the exporting user
    pub self_user: usize,
    /// Sent by the other side
    pub other: usize,
}

/// Count messages for each sender
#[must_use]
pub fn sender_counts(table: &MessageTable) -> SenderCounts {
    SenderCounts {
        self_user: table.by_sender(Sender::SelfUser).count(),
        other: table.by_sender(Sender::Other).count(),
    }
}

/// Gaussian kernel density of the hour-of-day values.
///
/// The bandwidth follows Scott's rule. The curve is evaluated on `points`
/// evenly spaced positions spanning three bandwidths past the smallest and
/// largest hour. Returns no points when there are fewer than two messages
/// or every message falls in the same hour.
#[must_use]
pub fn hour_density(hourly: &FrequencyTable<u32>, points: usize) -> Vec<(f64, f64)> {
    let n = hourly.total();
    if n < 2 || points < 2 {
        return Vec::new();
    }
    let n_f = n as f64;

    let weighted: Vec<(f64, f64)> = hourly
        .entries()
        .iter()
        .filter(|(_, c)| *c > 0)
        .map(|(h, c)| (f64::from(*h), *c as f64))
        .collect();

    let mean = weighted.iter().map(|(h, c)| h * c).sum::<f64>() / n_f;
    let variance = weighted
        .iter()
        .map(|(h, c)| c * (h - mean).powi(2))
        .sum::<f64>()
        / (n_f - 1.0);
    if variance <= 0.0 {
        return Vec::new();
    }

    let bandwidth = variance.sqrt() * n_f.powf(-0.2);
    let low = weighted.first().map_or(0.0, |(h, _)| *h) - 3.0 * bandwidth;
    let high = weighted.last().map_or(23.0, |(h, _)| *h) + 3.0 * bandwidth;
    let step = (high - low) / (points - 1) as f64;
    let norm = n_f * bandwidth * (2.0 * std::f64::consts::PI).sqrt();

    (0..points)
        .map(|i| {
            let x = (i as f64).mul_add(step, low);
            let density = weighted
                .iter()
                .map(|(h, c)| c * (-0.5 * ((x - h) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                / norm;
            (x, density)
        })
        .collect()
}

/// Busiest day and month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeakActivity {
    /// Date with the most messages
    pub day: NaiveDate,
    /// Messages on `day`
    pub day_count: usize,
    /// Month with the most messages
    pub month: YearMonth,
    /// Messages in `month`
    pub month_count: usize,
}

/// Find the busiest day and month; ties go to the earliest
pub fn peak_activity(table: &MessageTable) -> Result<PeakActivity> {
    let daily = daily_frequency(table);
    let monthly = monthly_frequency(table);

    let (day, day_count) = *daily.max_entry().ok_or(ChatStatsError::EmptyDataset)?;
    let (month, month_count) = *monthly.max_entry().ok_or(ChatStatsError::EmptyDataset)?;

    Ok(PeakActivity {
        day,
        day_count,
        month,
        month_count,
    })
}
