//! Endpoint paths and defaults used by the client.

/// Path of the snapshot endpoint, relative to the base URL.
pub const PRICES_PATH: [&str; 2] = ["api", "prices"];
/// First path segment of the history endpoint; the commodity key follows.
pub const HISTORY_SEGMENT: &str = "history";
/// Base URL used when none is given on the command line.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Key under which the history service stores a commodity: the display name lowercased.
pub fn history_key(commodity: &str) -> String {
    commodity.to_lowercase()
}
