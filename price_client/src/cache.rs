//! Per-commodity cache of daily-reduced historical series.
//!
//! Series are fetched on first demand and kept afterwards. A failed fetch
//! stores an empty series, so the panel shows "no historical data" instead of
//! retrying. Two fetches of the same commodity in flight both write; the later
//! write replaces the earlier one with equivalent data.
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use log::{info, warn};
use price_common::{HistoricalEntry, HistoricalSeries, Result};

use crate::source::PriceSource;

/// Pending history request, resolved by the caller and handed back to
/// [`HistoricalCache::complete`].
pub type HistoryFetch = Pin<Box<dyn Future<Output = Result<Vec<HistoricalEntry>>> + Send>>;

/// Outcome of [`HistoricalCache::ensure`].
pub enum Ensured {
    /// Already populated.
    Cached(HistoricalSeries),
    /// Not populated yet; the fetch still has to run.
    Pending(HistoryFetch),
}

/// Historical series keyed by commodity display name.
#[derive(Debug, Default)]
pub struct HistoricalCache {
    series: HashMap<String, HistoricalSeries>,
}

impl HistoricalCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `commodity` has a series, possibly empty.
    pub fn contains(&self, commodity: &str) -> bool {
        self.series.contains_key(commodity)
    }

    /// Number of cached commodities.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Drop every series.
    pub fn clear(&mut self) {
        self.series.clear();
    }

    /// Store the outcome of a history fetch for `commodity` and return the
    /// stored series.
    pub fn complete(
        &mut self,
        commodity: &str,
        fetched: Result<Vec<HistoricalEntry>>,
    ) -> &HistoricalSeries {
        let series = match fetched {
            Ok(raw) => {
                let raw_len = raw.len();
                let series = HistoricalSeries::from_raw(raw);
                info!(
                    "History of {}: {} points reduced to {} days",
                    commodity,
                    raw_len,
                    series.len()
                );
                series
            }
            Err(e) => {
                warn!("Failed to fetch history of {}: {}", commodity, e);
                HistoricalSeries::empty()
            }
        };
        self.series.insert(commodity.to_string(), series);
        &self.series[commodity]
    }

    /// Series of `commodity` if cached, otherwise the fetch that populates it.
    ///
    /// The cache is not borrowed while the fetch runs. Calling `ensure` again
    /// before [`complete`](Self::complete) issues a second fetch.
    pub fn ensure(&self, source: &Arc<dyn PriceSource>, commodity: &str) -> Ensured {
        if let Some(series) = self.series.get(commodity) {
            return Ensured::Cached(series.clone());
        }
        let source = Arc::clone(source);
        let commodity = commodity.to_string();
        Ensured::Pending(Box::pin(async move { source.fetch_history(&commodity).await }))
    }
}
