//! Usage record — monthly running time and cost of the VM.
//!
//! A `running_hours` of zero is a sentinel meaning "not computed yet" rather
//! than literally zero usage. The control API may also send the string
//! `"unknown"` for hours and cost; both decode to the sentinel.

use serde::{Deserialize, Deserializer};

/// Text shown in place of hours and cost while usage is unknown.
pub const UNKNOWN: &str = "Unknown";

/// Monthly usage as reported by the control API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    /// Human label of the billing month, e.g. `"October 2026"`.
    pub month: String,
    #[serde(deserialize_with = "number_or_unknown")]
    pub running_hours: f64,
    #[serde(deserialize_with = "number_or_unknown")]
    pub estimated_cost: f64,
    pub hourly_cost: f64,
}

/// Display-ready texts for the four usage targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageDisplay {
    pub month: String,
    pub running_hours: String,
    pub estimated_cost: String,
    pub hourly_cost: String,
}

impl UsageRecord {
    /// Whether the record carries the "not computed yet" sentinel.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.running_hours == 0.0
    }

    /// Render the record using `currency` as the amount prefix.
    #[must_use]
    pub fn display(&self, currency: &str) -> UsageDisplay {
        let (running_hours, estimated_cost) = if self.is_unknown() {
            (UNKNOWN.to_string(), UNKNOWN.to_string())
        } else {
            (
                format!("{} hours", self.running_hours),
                format_currency(currency, self.estimated_cost),
            )
        };
        UsageDisplay {
            month: self.month.clone(),
            running_hours,
            estimated_cost,
            hourly_cost: format_currency(currency, self.hourly_cost),
        }
    }
}

/// Format an amount with two decimals behind a currency symbol.
#[must_use]
pub fn format_currency(symbol: &str, amount: f64) -> String {
    format!("{symbol}{amount:.2}")
}

fn number_or_unknown<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) if text.eq_ignore_ascii_case("unknown") => Ok(0.0),
        Raw::Text(text) => Err(serde::de::Error::custom(format!(
            "expected a number or \"unknown\", got {text:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(running_hours: f64, estimated_cost: f64) -> UsageRecord {
        UsageRecord {
            month: "October 2026".to_string(),
            running_hours,
            estimated_cost,
            hourly_cost: 0.53,
        }
    }

    #[test]
    fn should_show_unknown_when_hours_are_zero() {
        let display = record(0.0, 0.0).display("€");
        assert_eq!(display.running_hours, "Unknown");
        assert_eq!(display.estimated_cost, "Unknown");
        assert_eq!(display.hourly_cost, "€0.53");
        assert_eq!(display.month, "October 2026");
    }

    #[test]
    fn should_format_hours_and_cost_when_known() {
        let display = record(12.5, 6.63).display("€");
        assert_eq!(display.running_hours, "12.5 hours");
        assert_eq!(display.estimated_cost, "€6.63");
        assert_eq!(display.hourly_cost, "€0.53");
    }

    #[test]
    fn should_print_whole_hours_without_fraction() {
        let display = record(40.0, 21.2).display("$");
        assert_eq!(display.running_hours, "40 hours");
        assert_eq!(display.estimated_cost, "$21.20");
    }

    #[test]
    fn should_always_use_two_decimals_for_currency() {
        assert_eq!(format_currency("€", 1.0), "€1.00");
        assert_eq!(format_currency("€", 0.125_1), "€0.13");
    }

    #[test]
    fn should_decode_numeric_usage() {
        let usage: UsageRecord = serde_json::from_str(
            r#"{"month":"May 2026","runningHours":3.25,"estimatedCost":1.72,"hourlyCost":0.53}"#,
        )
        .unwrap();
        assert!((usage.running_hours - 3.25).abs() < f64::EPSILON);
        assert!(!usage.is_unknown());
    }

    #[test]
    fn should_decode_unknown_strings_as_sentinel() {
        let usage: UsageRecord = serde_json::from_str(
            r#"{"month":"May 2026","runningHours":"unknown","estimatedCost":"unknown","hourlyCost":0.53}"#,
        )
        .unwrap();
        assert!(usage.is_unknown());
        assert_eq!(usage.display("€").estimated_cost, "Unknown");
    }

    #[test]
    fn should_reject_arbitrary_text_for_hours() {
        let result: Result<UsageRecord, _> = serde_json::from_str(
            r#"{"month":"May 2026","runningHours":"lots","estimatedCost":0,"hourlyCost":0.53}"#,
        );
        assert!(result.is_err());
    }
}
