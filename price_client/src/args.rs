//! Command-line arguments for the price dashboard.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use price_common::grouping::{COTLOOK_MARKER, COTTON_GROUP, GroupRule};
use price_common::net::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use price_common::{GroupingRules, HistoryRetention};

use crate::controller::{ControllerConfig, UiEvent};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Base URL of the price service.
    #[clap(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Case-insensitive substring that puts a commodity into the group.
    #[clap(long = "group-keyword", default_values = ["cotton", "cotlook"])]
    pub group_keywords: Vec<String>,

    /// Header of the group.
    #[clap(long, default_value = COTTON_GROUP)]
    pub group_name: String,

    /// Text marking the group's index price; empty disables the split.
    #[clap(long, default_value = COTLOOK_MARKER)]
    pub index_marker: String,

    /// Commodity or group to select after loading. Repeatable.
    #[clap(long)]
    pub select: Vec<String>,

    /// Commodity whose history panel to toggle after loading. Repeatable.
    #[clap(long)]
    pub history: Vec<String>,

    /// Whether cached history survives a snapshot refresh.
    #[clap(long, value_enum, default_value_t = HistoryRetention::Session)]
    pub history_retention: HistoryRetention,

    /// HTTP request timeout in seconds.
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Fetch a fresh snapshot after the other events have been applied.
    #[clap(long)]
    pub refresh: bool,

    /// Print every published frame instead of the final one.
    #[clap(long)]
    pub all_frames: bool,
}

impl Args {
    /// Grouping and retention settings.
    pub fn controller_config(&self) -> ControllerConfig {
        let marker = Some(self.index_marker.trim().to_string()).filter(|m| !m.is_empty());
        let rule = GroupRule::new(self.group_name.as_str(), &self.group_keywords, marker);
        ControllerConfig {
            rules: GroupingRules::new(vec![rule]),
            retention: self.history_retention,
        }
    }

    /// User events to replay once the snapshot is in: selections first,
    /// then history toggles, each in command-line order, then the refresh.
    pub fn events(&self) -> Vec<UiEvent> {
        self.select
            .iter()
            .cloned()
            .map(UiEvent::Select)
            .chain(self.history.iter().cloned().map(UiEvent::ExpandHistory))
            .chain(self.refresh.then_some(UiEvent::Refresh))
            .collect()
    }
}
