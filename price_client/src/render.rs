//! Render boundary and a plain-text terminal view.
//!
//! The controller publishes a `DisplayModel` to a `View` after every change.
//! `TextView` draws the cards as indented text: groups show their index price
//! and, when selected, their contracts; expanded history panels follow the
//! quote they belong to.
use std::io::Write;

use chrono::Local;
use log::error;
use price_common::grouping::GroupBreakdown;
use price_common::history::parse_timestamp;
use price_common::{DisplayEntry, GroupingRules, Quote, Result, classify};

use crate::model::{DisplayModel, HistoryPanel, SnapshotState};

/// Receives every published model.
pub trait View {
    /// Draw `model`.
    fn render(&mut self, model: &DisplayModel);
}

const TITLE: &str = "Commodity Prices";
const NO_DATA: &str = "No data available";
const NO_HISTORY: &str = "no historical data";

/// Text view over any writer.
pub struct TextView<W: Write> {
    out: W,
    rules: GroupingRules,
    settled_only: bool,
    pending: Option<String>,
}

impl<W: Write> TextView<W> {
    /// With `settled_only`, frames are held back and only the latest one is
    /// written by `flush`; otherwise every frame is written immediately.
    pub fn new(out: W, rules: GroupingRules, settled_only: bool) -> Self {
        TextView {
            out,
            rules,
            settled_only,
            pending: None,
        }
    }

    /// Write the held-back frame, if any.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(frame) = self.pending.take() {
            self.out.write_all(frame.as_bytes())?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Render `model` to a string.
    pub fn frame(&self, model: &DisplayModel) -> String {
        let mut lines = vec![TITLE.to_string(), "=".repeat(TITLE.len())];
        match &model.snapshot {
            SnapshotState::Loading => lines.push("Loading...".to_string()),
            SnapshotState::Unavailable => lines.push(NO_DATA.to_string()),
            SnapshotState::Ready(entries) if entries.is_empty() => lines.push(NO_DATA.to_string()),
            SnapshotState::Ready(entries) => {
                for entry in entries {
                    self.entry_lines(model, entry, &mut lines);
                }
            }
        }
        let mut frame = lines.join("\n");
        frame.push('\n');
        frame
    }

    fn entry_lines(&self, model: &DisplayModel, entry: &DisplayEntry, lines: &mut Vec<String>) {
        let selected = model.selected().as_deref() == Some(entry.key());
        match entry {
            DisplayEntry::Single { quote } => {
                let marker = if selected { "*" } else { " " };
                lines.push(format!("{} {}  {}", marker, quote.commodity, quote_cells(quote)));
                history_lines(model, quote, "    ", lines);
            }
            DisplayEntry::Group { name, members } => {
                let marker = if selected { "-" } else { "+" };
                let marker_text = self.rules.rule(name).and_then(|r| r.index_marker.as_deref());
                let breakdown = GroupBreakdown::split(members, marker_text);
                lines.push(format!("{} {} ({} contracts)", marker, name, breakdown.contracts.len()));
                if let Some(index) = breakdown.index {
                    lines.push(format!("    {}  {}", index.commodity, quote_cells(index)));
                    history_lines(model, index, "      ", lines);
                }
                if selected {
                    for contract in &breakdown.contracts {
                        lines.push(format!("    {}  {}", contract.label, quote_cells(contract.quote)));
                        history_lines(model, contract.quote, "      ", lines);
                    }
                }
            }
        }
    }
}

impl<W: Write> View for TextView<W> {
    fn render(&mut self, model: &DisplayModel) {
        let frame = self.frame(model);
        if self.settled_only {
            if model.is_settled() {
                self.pending = Some(frame);
            }
            return;
        }
        if let Err(e) = self.out.write_all(frame.as_bytes()) {
            error!("Failed to draw dashboard: {}", e);
        }
    }
}

/// Price, unit, change and access time of a quote.
fn quote_cells(quote: &Quote) -> String {
    let change = classify(quote.change.as_ref());
    let mut cells = match &quote.currency {
        Some(currency) => format!("{} {} {}", quote.price, currency, quote.unit),
        None => format!("{} {}", quote.price, quote.unit),
    };
    match change.display_text() {
        Some(text) => cells.push_str(&format!("  {} {} [{}]", change.icon, text, change.color)),
        None => cells.push_str(&format!("  {} n/a [{}]", change.icon, change.color)),
    }
    if !quote.timestamp.is_empty() {
        cells.push_str(&format!("  ({})", local_time(&quote.timestamp)));
    }
    cells
}

fn local_time(timestamp: &str) -> String {
    parse_timestamp(timestamp, &Local)
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

fn history_lines(model: &DisplayModel, quote: &Quote, indent: &str, lines: &mut Vec<String>) {
    if !model.history_open(&quote.commodity) {
        return;
    }
    match model.history.get(&quote.commodity) {
        None | Some(HistoryPanel::Loading) => lines.push(format!("{}loading history...", indent)),
        Some(HistoryPanel::Loaded(series)) if series.is_empty() => {
            lines.push(format!("{}{}", indent, NO_HISTORY))
        }
        Some(HistoryPanel::Loaded(series)) => {
            for point in series.entries() {
                lines.push(format!(
                    "{}{}  {} {}",
                    indent,
                    local_time(&point.timestamp),
                    point.price,
                    point.unit
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use price_common::{FlexValue, HistoricalEntry, HistoricalSeries, Panel};

    fn snapshot() -> Vec<Quote> {
        vec![
            Quote::new("Cotton (Cotton H24)", 90.0, Some(FlexValue::from("1.2%")), "c/lb", ""),
            Quote::new("Cotlook A Index", 95.0, Some(FlexValue::from("-0.5")), "c/lb", ""),
            Quote::new("Wheat H2", 300.0, Some(FlexValue::Number(0.0)), "$/t", ""),
            Quote::new("Beef", "612", None, "c/kg", ""),
        ]
    }

    fn ready_model() -> DisplayModel {
        DisplayModel {
            snapshot: SnapshotState::Ready(GroupingRules::default().transform(&snapshot())),
            ..Default::default()
        }
    }

    fn view() -> TextView<Vec<u8>> {
        TextView::new(Vec::new(), GroupingRules::default(), false)
    }

    #[test]
    fn collapsed_group_shows_index_only() {
        let frame = view().frame(&ready_model());
        assert!(frame.contains("+ Cotton (1 contracts)"));
        assert!(frame.contains("    Cotlook A Index  95 c/lb  ▼ -0.5% [red]"));
        assert!(!frame.contains("Mar 24"));
        assert!(frame.contains("  Wheat H2  300 $/t  ► 0% [gray]"));
        assert!(frame.contains("  Beef  612 c/kg  ► n/a [gray]"));
    }

    #[test]
    fn selected_group_lists_contracts() {
        let mut model = ready_model();
        model.panels = model.panels.toggle(Panel::Selection, "Cotton");
        let frame = view().frame(&model);
        assert!(frame.contains("- Cotton (1 contracts)"));
        assert!(frame.contains("    Mar 24  90 c/lb  ▲ 1.2% [green]"));
    }

    #[test]
    fn history_panel_states() {
        let mut model = ready_model();
        model.panels = model.panels.toggle(Panel::History, "Wheat H2");
        model.history.insert("Wheat H2".into(), HistoryPanel::Loading);
        assert!(view().frame(&model).contains("    loading history..."));

        model.history.insert("Wheat H2".into(), HistoryPanel::Loaded(HistoricalSeries::empty()));
        assert!(view().frame(&model).contains("    no historical data"));

        let series = HistoricalSeries::from_raw(vec![HistoricalEntry {
            commodity: "Wheat H2".into(),
            price: FlexValue::Number(298.0),
            unit: "$/t".into(),
            timestamp: "2024-05-01T10:00:00".into(),
        }]);
        model.history.insert("Wheat H2".into(), HistoryPanel::Loaded(series));
        assert!(view().frame(&model).contains("    2024-05-01 10:00  298 $/t"));
    }

    #[test]
    fn empty_and_failed_snapshots() {
        let loading = view().frame(&DisplayModel::default());
        assert!(loading.contains("Loading..."));
        for snapshot in [SnapshotState::Unavailable, SnapshotState::Ready(Vec::new())] {
            let model = DisplayModel {
                snapshot,
                ..Default::default()
            };
            assert!(view().frame(&model).contains(NO_DATA));
        }
    }

    #[test]
    fn settled_only_view_holds_back_frames() {
        let mut view = TextView::new(Vec::new(), GroupingRules::default(), true);
        view.render(&DisplayModel::default());
        view.flush().unwrap();
        assert!(view.out.is_empty());

        view.render(&ready_model());
        assert!(view.out.is_empty());
        view.flush().unwrap();
        let written = String::from_utf8(view.out.clone()).unwrap();
        assert!(written.starts_with(TITLE));
    }
}
