//! Quote payload returned by the snapshot endpoint.
//!
//! The upstream service is loosely typed: `price` arrives as either a number or
//! a string, and `change` as a number, a string, a string with a trailing `%`,
//! or not at all. `FlexValue` captures both shapes once at the deserialization
//! boundary so later code never inspects raw JSON.
use std::fmt;

use serde::{Deserialize, Serialize};

/// A JSON scalar that may be a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexValue {
    /// Bare JSON number.
    Number(f64),
    /// JSON string, kept verbatim.
    Text(String),
}

impl FlexValue {
    /// Text form of the value exactly as it should be shown to a user.
    pub fn to_text(&self) -> String {
        match self {
            FlexValue::Number(n) => n.to_string(),
            FlexValue::Text(s) => s.clone(),
        }
    }

    /// Numeric value, if the value is a number or a string holding one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FlexValue::Number(n) => Some(*n),
            FlexValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

impl fmt::Display for FlexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlexValue::Number(n) => write!(f, "{}", n),
            FlexValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for FlexValue {
    fn from(value: f64) -> Self {
        FlexValue::Number(value)
    }
}

impl From<&str> for FlexValue {
    fn from(value: &str) -> Self {
        FlexValue::Text(value.to_string())
    }
}

/// Latest price snapshot for one commodity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Display name, also the identity of the quote within one snapshot.
    pub commodity: String,
    /// Last price, number or text.
    pub price: FlexValue,
    /// Percent change; `None` when absent or `null`.
    #[serde(default)]
    pub change: Option<FlexValue>,
    /// Price unit (e.g. `$/bale`).
    #[serde(default)]
    pub unit: String,
    /// ISO-8601 access time.
    #[serde(default)]
    pub timestamp: String,
    /// Price currency, when the upstream reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Page the price was scraped from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Quote {
    /// Build a quote with the required fields; optional fields are left empty.
    pub fn new(
        commodity: impl Into<String>,
        price: impl Into<FlexValue>,
        change: Option<FlexValue>,
        unit: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Quote {
            commodity: commodity.into(),
            price: price.into(),
            change,
            unit: unit.into(),
            timestamp: timestamp.into(),
            currency: None,
            source: None,
        }
    }
}
