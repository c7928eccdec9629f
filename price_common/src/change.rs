//! Percent-change classification.
//!
//! `classify` turns whatever the upstream put in a quote's `change` field into a
//! sign, an arrow glyph and a color token. It is total and pure: anything that
//! cannot be read as a finite number classifies as `Unknown`.
use log::debug;
use strum_macros::{Display, EnumString};

use crate::error::DashboardError;
use crate::quote::FlexValue;
use crate::result::Result;

/// Direction of a price change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Sign {
    /// Strictly greater than zero.
    Positive,
    /// Strictly less than zero.
    Negative,
    /// Exactly zero.
    Zero,
    /// Missing or unparseable.
    Unknown,
}

/// Color token understood by the render layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ColorToken {
    #[allow(missing_docs)]
    Green,
    #[allow(missing_docs)]
    Red,
    #[allow(missing_docs)]
    Gray,
}

/// Up arrow for rising prices.
pub const ICON_UP: &str = "▲";
/// Down arrow for falling prices.
pub const ICON_DOWN: &str = "▼";
/// Neutral arrow for flat or unknown changes.
pub const ICON_NEUTRAL: &str = "►";

impl Sign {
    /// Glyph shown next to the change.
    pub fn icon(self) -> &'static str {
        match self {
            Sign::Positive => ICON_UP,
            Sign::Negative => ICON_DOWN,
            Sign::Zero | Sign::Unknown => ICON_NEUTRAL,
        }
    }

    /// Color used for the change cell.
    pub fn color(self) -> ColorToken {
        match self {
            Sign::Positive => ColorToken::Green,
            Sign::Negative => ColorToken::Red,
            Sign::Zero | Sign::Unknown => ColorToken::Gray,
        }
    }

    fn of(value: f64) -> Self {
        if value > 0.0 {
            Sign::Positive
        } else if value < 0.0 {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }
}

/// Result of classifying a change value.
///
/// Never cache this next to a quote; it is cheap to recompute and must follow
/// the quote it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeClassification {
    /// Direction of the change.
    pub sign: Sign,
    /// Arrow glyph for `sign`.
    pub icon: &'static str,
    /// Color token for `sign`.
    pub color: ColorToken,
    /// Input text, unmodified. `None` when the input was absent or empty.
    pub original: Option<String>,
}

impl ChangeClassification {
    fn new(sign: Sign, original: Option<String>) -> Self {
        ChangeClassification {
            sign,
            icon: sign.icon(),
            color: sign.color(),
            original,
        }
    }

    /// Display text for the change: the original text with a `%` appended
    /// unless it already carries one. Unparseable text is shown as received.
    /// `None` for absent input.
    pub fn display_text(&self) -> Option<String> {
        self.original.as_ref().map(|text| {
            if self.sign == Sign::Unknown || text.contains('%') {
                text.clone()
            } else {
                format!("{}%", text)
            }
        })
    }
}

/// Parse a change text into its numeric value.
///
/// Strips one trailing `%` and surrounding whitespace, then expects a finite
/// decimal number.
pub fn parse_change(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    match number.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(DashboardError::MalformedChange(text.to_string())),
    }
}

/// Classify a raw change value.
pub fn classify(change: Option<&FlexValue>) -> ChangeClassification {
    let text = match change {
        None => return ChangeClassification::new(Sign::Unknown, None),
        Some(value) => value.to_text(),
    };
    if text.trim().is_empty() {
        return ChangeClassification::new(Sign::Unknown, None);
    }

    match parse_change(&text) {
        Ok(value) => ChangeClassification::new(Sign::of(value), Some(text)),
        Err(e) => {
            debug!("{}", e);
            ChangeClassification::new(Sign::Unknown, Some(text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FlexValue {
        FlexValue::Text(s.to_string())
    }

    #[test]
    fn absent_and_empty_are_unknown() {
        for input in [None, Some(text("")), Some(text("   "))] {
            let c = classify(input.as_ref());
            assert_eq!(c.sign, Sign::Unknown);
            assert_eq!(c.icon, ICON_NEUTRAL);
            assert_eq!(c.color, ColorToken::Gray);
            assert_eq!(c.display_text(), None);
        }
    }

    #[test]
    fn signs_follow_parsed_value() {
        let cases = [
            (text("3.2"), Sign::Positive),
            (text("3.2%"), Sign::Positive),
            (text("-1.5%"), Sign::Negative),
            (text("0"), Sign::Zero),
            (text("-0.0%"), Sign::Zero),
            (text("abc"), Sign::Unknown),
            (text("1.2.3%"), Sign::Unknown),
            (text("NaN"), Sign::Unknown),
            (text("inf"), Sign::Unknown),
            (FlexValue::Number(7.0), Sign::Positive),
            (FlexValue::Number(-2.0), Sign::Negative),
            (FlexValue::Number(0.0), Sign::Zero),
        ];
        for (input, expected) in cases {
            assert_eq!(classify(Some(&input)).sign, expected, "input {:?}", input);
        }
    }

    #[test]
    fn icon_and_color_follow_sign() {
        let up = classify(Some(&text("1.2%")));
        assert_eq!((up.icon, up.color), (ICON_UP, ColorToken::Green));
        let down = classify(Some(&text("-0.5")));
        assert_eq!((down.icon, down.color), (ICON_DOWN, ColorToken::Red));
        let flat = classify(Some(&FlexValue::Number(0.0)));
        assert_eq!((flat.icon, flat.color), (ICON_NEUTRAL, ColorToken::Gray));
    }

    #[test]
    fn percent_is_appended_only_once() {
        assert_eq!(
            classify(Some(&text("-1.5%"))).display_text().as_deref(),
            Some("-1.5%")
        );
        assert_eq!(
            classify(Some(&text("3.2"))).display_text().as_deref(),
            Some("3.2%")
        );
        assert_eq!(
            classify(Some(&FlexValue::Number(7.0))).display_text().as_deref(),
            Some("7%")
        );
    }

    #[test]
    fn unparseable_change_is_shown_unsuffixed() {
        let c = classify(Some(&text("abc")));
        assert_eq!(c.sign, Sign::Unknown);
        assert_eq!(c.display_text().as_deref(), Some("abc"));
        assert_eq!(classify(Some(&text("n/a%"))).display_text().as_deref(), Some("n/a%"));
    }

    #[test]
    fn malformed_change_is_reported_by_parser() {
        assert!(matches!(
            parse_change("abc"),
            Err(DashboardError::MalformedChange(s)) if s == "abc"
        ));
        assert_eq!(parse_change(" 2.5 % ").unwrap(), 2.5);
    }
}
