//! Presentation lookup tables shared by every calendar view.

use serde::{Deserialize, Serialize};

use crate::event::{EventStatus, EventType};

/// Style used for any type or status outside the known enumerations.
pub const NEUTRAL_STYLE: &str = "bg-gray-100 text-gray-800 border-gray-200";

pub fn color_for_type(event_type: &EventType) -> &'static str {
    match event_type {
        EventType::Job => "bg-blue-100 text-blue-800 border-blue-200",
        EventType::Milestone => "bg-purple-100 text-purple-800 border-purple-200",
        EventType::Visit => "bg-green-100 text-green-800 border-green-200",
        EventType::Invoice => "bg-amber-100 text-amber-800 border-amber-200",
        EventType::Call => "bg-sky-100 text-sky-800 border-sky-200",
        EventType::Payout => "bg-emerald-100 text-emerald-800 border-emerald-200",
        EventType::Meeting => "bg-blue-100 text-blue-800 border-blue-200",
        EventType::Project => "bg-indigo-100 text-indigo-800 border-indigo-200",
        EventType::Deadline => "bg-red-100 text-red-800 border-red-200",
        EventType::Task => "bg-yellow-100 text-yellow-800 border-yellow-200",
        EventType::Conference => "bg-violet-100 text-violet-800 border-violet-200",
        EventType::Presentation => "bg-pink-100 text-pink-800 border-pink-200",
        EventType::ClientMeeting => "bg-teal-100 text-teal-800 border-teal-200",
        EventType::TeamMeeting => "bg-cyan-100 text-cyan-800 border-cyan-200",
        EventType::Review => "bg-orange-100 text-orange-800 border-orange-200",
        EventType::Other(_) => NEUTRAL_STYLE,
    }
}

pub fn color_for_status(status: &EventStatus) -> &'static str {
    match status {
        EventStatus::Draft => "bg-gray-100 text-gray-600",
        EventStatus::Open => "bg-blue-100 text-blue-700",
        EventStatus::Quoted => "bg-amber-100 text-amber-700",
        EventStatus::InProgress => "bg-yellow-100 text-yellow-800",
        EventStatus::Completed => "bg-green-100 text-green-700",
        EventStatus::Cancelled => "bg-red-100 text-red-700",
        EventStatus::Scheduled => "bg-indigo-100 text-indigo-700",
        EventStatus::Other(_) => NEUTRAL_STYLE,
    }
}

/// How amounts are rendered: whole units, grouped thousands, currency
/// symbol before or after the number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub grouping_separator: String,
    pub symbol_after: bool,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            symbol: "SAR".to_string(),
            grouping_separator: ",".to_string(),
            symbol_after: false,
        }
    }
}

impl CurrencyFormat {
    /// Format an amount with no decimal places, rounding half away from zero.
    /// Non-finite input formats as zero.
    pub fn format(&self, amount: f64) -> String {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        let rounded = amount.round();
        let digits = group_thousands(rounded.abs() as u64, &self.grouping_separator);
        let sign = if rounded < 0.0 { "-" } else { "" };

        if self.symbol_after {
            format!("{sign}{digits} {}", self.symbol)
        } else {
            format!("{sign}{} {digits}", self.symbol)
        }
    }
}

fn group_thousands(value: u64, separator: &str) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3 * separator.len());

    for (i, c) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_type_has_its_own_style() {
        for t in EventType::ENGINEER.iter().chain(EventType::ENTERPRISE.iter()) {
            assert_ne!(color_for_type(t), NEUTRAL_STYLE, "{t} fell back to neutral");
        }
    }

    #[test]
    fn test_unknown_values_fall_back_to_neutral() {
        assert_eq!(color_for_type(&EventType::from("site-walk")), NEUTRAL_STYLE);
        assert_eq!(color_for_status(&EventStatus::from("archived")), NEUTRAL_STYLE);
    }

    #[test]
    fn test_format_currency_groups_thousands() {
        let sar = CurrencyFormat::default();
        assert_eq!(sar.format(0.0), "SAR 0");
        assert_eq!(sar.format(999.0), "SAR 999");
        assert_eq!(sar.format(1000.0), "SAR 1,000");
        assert_eq!(sar.format(12500.0), "SAR 12,500");
        assert_eq!(sar.format(1234567.0), "SAR 1,234,567");
    }

    #[test]
    fn test_format_currency_rounds_to_whole_units() {
        let sar = CurrencyFormat::default();
        assert_eq!(sar.format(1499.5), "SAR 1,500");
        assert_eq!(sar.format(1499.49), "SAR 1,499");
    }

    #[test]
    fn test_format_currency_custom_layout() {
        let eur = CurrencyFormat {
            symbol: "€".to_string(),
            grouping_separator: ".".to_string(),
            symbol_after: true,
        };
        assert_eq!(eur.format(25000.0), "25.000 €");
    }

    #[test]
    fn test_format_currency_non_finite_is_zero() {
        assert_eq!(CurrencyFormat::default().format(f64::NAN), "SAR 0");
    }
}
