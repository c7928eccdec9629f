//!
//! Domain logic of the commodity price dashboard, free of I/O.
//!
//! This crate aggregates:
//! - `error`: unified error type `DashboardError` used across the workspace.
//! - `result`: handy `Result<T, DashboardError>` alias.
//! - `quote`: snapshot quotes and their loosely typed fields.
//! - `change`: percent-change classification.
//! - `contract`: futures contract labels.
//! - `grouping`: snapshot to display entries.
//! - `accordion`: single-expansion panel state.
//! - `history`: historical series and daily reduction.
//! - `net`: endpoint paths and defaults.
#![warn(missing_docs)]
pub mod accordion;
pub mod change;
pub mod contract;
pub mod error;
pub mod grouping;
pub mod history;
pub mod net;
pub mod quote;
pub mod result;

pub use accordion::{Accordion, Accordions, Panel};
pub use change::{ChangeClassification, Sign, classify};
pub use error::DashboardError;
pub use grouping::{DisplayEntry, GroupingRules};
pub use history::{HistoricalEntry, HistoricalSeries, HistoryRetention};
pub use quote::{FlexValue, Quote};
pub use result::Result;
