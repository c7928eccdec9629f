//! Historical price series.
//!
//! The history endpoint returns every scrape of a commodity. The dashboard keeps
//! at most one point per local calendar day (the latest of that day), newest
//! first. Entries whose timestamp cannot be read are dropped with a warning.
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use clap::ValueEnum;
use log::warn;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::DashboardError;
use crate::quote::FlexValue;
use crate::result::Result;

/// Accepted layouts for timestamps that carry no UTC offset.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// One raw point from the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEntry {
    /// Commodity display name.
    #[serde(default)]
    pub commodity: String,
    /// Price at that time, number or text.
    pub price: FlexValue,
    /// Price unit.
    #[serde(default)]
    pub unit: String,
    /// ISO-8601 timestamp.
    pub timestamp: String,
}

/// Daily-reduced series of one commodity, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalSeries {
    entries: Vec<HistoricalEntry>,
}

impl HistoricalSeries {
    /// Series with no points.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reduce raw entries to one per local calendar day.
    pub fn from_raw(entries: Vec<HistoricalEntry>) -> Self {
        daily_reduction(entries, &Local)
    }

    /// Points, newest first.
    pub fn entries(&self) -> &[HistoricalEntry] {
        &self.entries
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the series has no points.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse an ISO-8601 timestamp in `tz`.
///
/// Timestamps with an offset are converted; naive ones are taken as local time
/// in `tz`; a bare date means midnight.
pub fn parse_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Result<DateTime<Tz>> {
    let text = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Ok(at.with_timezone(tz));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| DashboardError::InvalidTimestamp(raw.to_string()))?;

    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| DashboardError::InvalidTimestamp(raw.to_string()))
}

/// Keep the latest entry of each calendar day in `tz`, newest day first.
pub fn daily_reduction<Tz: TimeZone>(entries: Vec<HistoricalEntry>, tz: &Tz) -> HistoricalSeries {
    let mut latest: BTreeMap<NaiveDate, (DateTime<Tz>, HistoricalEntry)> = BTreeMap::new();

    for entry in entries {
        let at = match parse_timestamp(&entry.timestamp, tz) {
            Ok(at) => at,
            Err(e) => {
                warn!("Dropping history point of {:?}: {}", entry.commodity, e);
                continue;
            }
        };
        match latest.entry(at.date_naive()) {
            Entry::Occupied(mut slot) => {
                if at > slot.get().0 {
                    slot.insert((at, entry));
                }
            }
            Entry::Vacant(slot) => {
                slot.insert((at, entry));
            }
        }
    }

    let mut kept: Vec<(DateTime<Tz>, HistoricalEntry)> = latest.into_values().collect();
    kept.sort_by(|a, b| b.0.cmp(&a.0));
    HistoricalSeries {
        entries: kept.into_iter().map(|(_, entry)| entry).collect(),
    }
}

/// What happens to cached series when the snapshot is refreshed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Display, EnumString)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HistoryRetention {
    /// Series live for the whole session.
    #[default]
    Session,
    /// Series are dropped whenever a new snapshot arrives.
    Refresh,
}
