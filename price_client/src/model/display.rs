//! Everything a view needs to draw the dashboard.
use std::collections::BTreeMap;

use price_common::{Accordions, DisplayEntry, HistoricalSeries, Panel};

/// State of the quote snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SnapshotState {
    /// First fetch still pending.
    #[default]
    Loading,
    /// The fetch failed; shown as "no data available".
    Unavailable,
    /// Grouped quotes.
    Ready(Vec<DisplayEntry>),
}

/// State of one commodity's history panel.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryPanel {
    /// Fetch in flight.
    Loading,
    /// Daily series; empty means "no historical data".
    Loaded(HistoricalSeries),
}

/// Dashboard view model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayModel {
    /// Snapshot entries.
    pub snapshot: SnapshotState,
    /// Selection and history accordions.
    pub panels: Accordions<Panel>,
    /// History panels that have been requested at least once.
    pub history: BTreeMap<String, HistoryPanel>,
}

impl DisplayModel {
    /// Display entries, empty unless the snapshot is ready.
    pub fn entries(&self) -> &[DisplayEntry] {
        match &self.snapshot {
            SnapshotState::Ready(entries) => entries,
            SnapshotState::Loading | SnapshotState::Unavailable => &[],
        }
    }

    /// Currently selected commodity or group.
    pub fn selected(&self) -> Option<String> {
        self.panels
            .get(&Panel::Selection)
            .open_key()
            .map(str::to_string)
    }

    /// Whether the history panel of `commodity` is expanded.
    pub fn history_open(&self, commodity: &str) -> bool {
        self.panels.is_open(&Panel::History, commodity)
    }

    /// Nothing is loading.
    pub fn is_settled(&self) -> bool {
        self.snapshot != SnapshotState::Loading
            && !self
                .history
                .values()
                .any(|panel| matches!(panel, HistoryPanel::Loading))
    }
}
