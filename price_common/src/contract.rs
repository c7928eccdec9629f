//! Labels for the members of a futures group.
//!
//! Futures are named `"<Name> (Cotton <MonthCode><YY>)"`, e.g.
//! `"ICE Cotton No.2 (Cotton Z24)"`. The month code is one of the exchange
//! letters traded for cotton. Anything else keeps its raw name.
use std::fmt;

use log::debug;
use strum_macros::{Display, EnumString};

use crate::error::DashboardError;
use crate::result::Result;

/// Marker for the cash (spot) contract.
pub const CASH_MARKER: &str = "Cotton Cash";
const CONTRACT_PREFIX: &str = " (Cotton ";

/// Exchange month letters used by cotton futures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum MonthCode {
    /// March.
    #[strum(serialize = "H", to_string = "Mar")]
    H,
    /// May.
    #[strum(serialize = "K", to_string = "May")]
    K,
    /// July.
    #[strum(serialize = "N", to_string = "Jul")]
    N,
    /// October.
    #[strum(serialize = "V", to_string = "Oct")]
    V,
    /// December.
    #[strum(serialize = "Z", to_string = "Dec")]
    Z,
}

/// Display label of a group member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractLabel {
    /// The cash contract.
    Cash,
    /// A dated futures contract.
    Future {
        /// Text before the parenthesised code.
        name: String,
        /// Delivery month.
        month: MonthCode,
        /// Two-digit delivery year.
        year: u8,
    },
    /// Unrecognized name, shown verbatim.
    Raw(String),
}

impl ContractLabel {
    /// Derive the label of a commodity name. Never fails; unrecognized names
    /// fall back to `Raw`.
    pub fn from_commodity(commodity: &str) -> Self {
        if commodity.contains(CASH_MARKER) {
            return ContractLabel::Cash;
        }
        match Self::try_parse_future(commodity) {
            Ok(label) => label,
            Err(e) => {
                debug!("{}", e);
                ContractLabel::Raw(commodity.to_string())
            }
        }
    }

    /// Parse the `"<Name> (Cotton <MonthCode><YY>)"` pattern.
    pub fn try_parse_future(commodity: &str) -> Result<Self> {
        let unrecognized = || DashboardError::UnrecognizedContractPattern(commodity.to_string());

        let inner = commodity.trim().strip_suffix(')').ok_or_else(unrecognized)?;
        let (name, code) = inner.rsplit_once(CONTRACT_PREFIX).ok_or_else(unrecognized)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(unrecognized());
        }

        let mut chars = code.chars();
        let month = chars
            .next()
            .and_then(|c| c.to_string().parse::<MonthCode>().ok())
            .ok_or_else(unrecognized)?;
        let digits = chars.as_str();
        if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(unrecognized());
        }
        let year = digits.parse::<u8>().map_err(|_| unrecognized())?;

        Ok(ContractLabel::Future {
            name: name.to_string(),
            month,
            year,
        })
    }
}

impl fmt::Display for ContractLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractLabel::Cash => f.write_str("Cash"),
            ContractLabel::Future { month, year, .. } => write!(f, "{} {:02}", month, year),
            ContractLabel::Raw(name) => f.write_str(name),
        }
    }
}
