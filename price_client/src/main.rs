//! Price Client: a terminal dashboard for commodity prices. It fetches the latest
//! snapshot from the price service, groups related contracts (cotton futures under
//! one card with the Cotlook A Index as headline price), and prints each quote with
//! its change direction. Selections and history panels given on the command line
//! are applied once the snapshot is in; history is fetched on demand, reduced to
//! one point per day and cached for the session.
//!
//! Usage example (CLI):
//! ```bash
//! price_client --base-url http://192.168.0.10:8000 --select Cotton --history "Wheat (H2)"
//! price_client --history "Wheat (H2)" --refresh --history-retention refresh
//! ```
//!
//! Set `RUST_LOG=debug` to see every request and event.
#![warn(missing_docs)]
mod args;
mod cache;
mod controller;
mod model;
mod render;
mod source;

use crate::args::Args;
use crate::controller::SnapshotController;
use crate::render::TextView;
use crate::source::HttpPriceSource;
use clap::Parser;
use log::{debug, info};
use price_common::DashboardError;
use price_common::Result;
use std::io;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), DashboardError> {
    init_logger();
    let args = Args::parse();
    let config = args.controller_config();

    let source = HttpPriceSource::new(&args.base_url, Duration::from_secs(args.timeout_secs))?;
    info!("Price service: {}", args.base_url);

    let view = TextView::new(io::stdout(), config.rules.clone(), !args.all_frames);
    let mut controller = SnapshotController::new(Arc::new(source), config, view);

    controller.start();
    controller.settle().await;

    for event in args.events() {
        controller.handle(event);
    }
    controller.settle().await;
    info!("{} entries on the dashboard", controller.model().entries().len());
    debug!("{} histories cached", controller.cache().len());

    controller.view_mut().flush()
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
