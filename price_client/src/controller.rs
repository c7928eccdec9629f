//! Snapshot controller.
//!
//! Owns the display model, both accordions and the historical cache, and is the
//! only thing that mutates them. Fetches run as spawned tasks and report back
//! over a channel; `next_completion` applies one result at a time, so every
//! mutation runs to completion before the next starts. Pending fetches are
//! never cancelled.
use std::future::Future;
use std::sync::Arc;

use log::{debug, error, info};
use price_common::{
    GroupingRules, HistoricalEntry, HistoryRetention, Panel, Quote, Result,
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::cache::{Ensured, HistoricalCache};
use crate::model::{DisplayModel, HistoryPanel, SnapshotState};
use crate::render::View;
use crate::source::PriceSource;

/// Controller settings.
#[derive(Debug, Clone, Default)]
pub struct ControllerConfig {
    /// How quotes are grouped.
    pub rules: GroupingRules,
    /// Whether cached history survives a snapshot refresh.
    pub retention: HistoryRetention,
}

/// User interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Toggle the drill-down selection of a commodity or group.
    Select(String),
    /// Toggle the history panel of a commodity.
    ExpandHistory(String),
    /// Fetch a fresh snapshot.
    Refresh,
}

enum Completion {
    Snapshot {
        generation: u64,
        fetched: Result<Vec<Quote>>,
    },
    History {
        commodity: String,
        fetched: Result<Vec<HistoricalEntry>>,
    },
}

/// Drives the dashboard from fetch results and user events.
pub struct SnapshotController<V: View> {
    source: Arc<dyn PriceSource>,
    config: ControllerConfig,
    view: V,
    model: DisplayModel,
    cache: HistoricalCache,
    generation: u64,
    in_flight: usize,
    completions_tx: UnboundedSender<Completion>,
    completions_rx: UnboundedReceiver<Completion>,
}

impl<V: View> SnapshotController<V> {
    /// Create an idle controller. Nothing is fetched until `start`.
    pub fn new(source: Arc<dyn PriceSource>, config: ControllerConfig, view: V) -> Self {
        let (completions_tx, completions_rx) = unbounded_channel();
        SnapshotController {
            source,
            config,
            view,
            model: DisplayModel::default(),
            cache: HistoricalCache::new(),
            generation: 0,
            in_flight: 0,
            completions_tx,
            completions_rx,
        }
    }

    /// Current model.
    pub fn model(&self) -> &DisplayModel {
        &self.model
    }

    /// Mutable access to the view.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Historical cache.
    pub fn cache(&self) -> &HistoricalCache {
        &self.cache
    }

    /// Issue the initial snapshot fetch. Must be called inside a tokio runtime.
    pub fn start(&mut self) {
        info!("Loading snapshot");
        self.request_snapshot();
    }

    /// Apply a user event.
    pub fn handle(&mut self, event: UiEvent) {
        debug!("Event: {:?}", event);
        match event {
            UiEvent::Select(key) => {
                self.model.panels = self.model.panels.toggle(Panel::Selection, &key);
                self.publish();
            }
            UiEvent::ExpandHistory(commodity) => self.expand_history(commodity),
            UiEvent::Refresh => self.request_snapshot(),
        }
    }

    /// Wait for one pending fetch and apply it. Returns `false` when nothing
    /// is pending.
    pub async fn next_completion(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.completions_rx.recv().await {
            Some(completion) => {
                self.in_flight -= 1;
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    /// Apply completions until nothing is pending.
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    fn expand_history(&mut self, commodity: String) {
        self.model.panels = self.model.panels.toggle(Panel::History, &commodity);
        if self.model.history_open(&commodity) {
            self.load_history(commodity);
        }
        self.publish();
    }

    fn load_history(&mut self, commodity: String) {
        match self.cache.ensure(&self.source, &commodity) {
            Ensured::Cached(series) => {
                self.model
                    .history
                    .insert(commodity, HistoryPanel::Loaded(series));
            }
            Ensured::Pending(fetch) => {
                self.model
                    .history
                    .insert(commodity.clone(), HistoryPanel::Loading);
                self.spawn(async move {
                    let fetched = fetch.await;
                    Completion::History { commodity, fetched }
                });
            }
        }
    }

    fn request_snapshot(&mut self) {
        self.generation += 1;
        if self.model.snapshot == SnapshotState::Unavailable {
            self.model.snapshot = SnapshotState::Loading;
        }
        let generation = self.generation;
        let source = Arc::clone(&self.source);
        self.spawn(async move {
            let fetched = source.fetch_prices().await;
            Completion::Snapshot {
                generation,
                fetched,
            }
        });
        self.publish();
    }

    fn spawn<F>(&mut self, fetch: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(fetch.await);
        });
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Snapshot {
                generation,
                fetched,
            } => {
                if generation != self.generation {
                    debug!("Discarding superseded snapshot #{}", generation);
                    return;
                }
                match fetched {
                    Ok(quotes) => {
                        info!("Snapshot received: {} quotes", quotes.len());
                        if self.config.retention == HistoryRetention::Refresh {
                            self.drop_history();
                        }
                        self.model.snapshot =
                            SnapshotState::Ready(self.config.rules.transform(&quotes));
                    }
                    Err(e) => {
                        error!("Failed to fetch prices: {}", e);
                        self.model.snapshot = SnapshotState::Unavailable;
                    }
                }
            }
            Completion::History { commodity, fetched } => {
                if self.cache.contains(&commodity) {
                    debug!("History of {} fetched twice; keeping the later one", commodity);
                }
                let series = self.cache.complete(&commodity, fetched).clone();
                self.model
                    .history
                    .insert(commodity, HistoryPanel::Loaded(series));
            }
        }
        self.publish();
    }

    /// Forget loaded series; panels still loading keep their pending fetch.
    /// An open panel whose series was dropped is fetched again.
    fn drop_history(&mut self) {
        if !self.cache.is_empty() {
            info!("Dropping {} cached histories", self.cache.len());
        }
        self.cache.clear();
        self.model
            .history
            .retain(|_, panel| matches!(panel, HistoryPanel::Loading));

        let open = self
            .model
            .panels
            .get(&Panel::History)
            .open_key()
            .map(str::to_string);
        if let Some(commodity) = open {
            if !self.model.history.contains_key(&commodity) {
                debug!("Reloading history of {}", commodity);
                self.load_history(commodity);
            }
        }
    }

    fn publish(&mut self) {
        self.view.render(&self.model);
    }
}
