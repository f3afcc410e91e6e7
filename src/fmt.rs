use std::fmt::{Debug, Display, Formatter};

use crate::{prelude::*, quantity::power::Watts};

/// Locale-dependent number formatting rules.
///
/// Built once from the configuration and passed down explicitly.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NumberFormat {
    pub thousands_separator: &'static str,
    pub decimal_separator: &'static str,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::C
    }
}

impl NumberFormat {
    /// Plain `C` locale: no grouping.
    pub const C: Self = Self { thousands_separator: "", decimal_separator: "." };

    const COMMA_POINT: Self = Self { thousands_separator: ",", decimal_separator: "." };
    const POINT_COMMA: Self = Self { thousands_separator: ".", decimal_separator: "," };
    const SPACE_COMMA: Self = Self { thousands_separator: "\u{a0}", decimal_separator: "," };
    const APOSTROPHE_POINT: Self = Self { thousands_separator: "'", decimal_separator: "." };

    /// Resolve a POSIX (`en_US.UTF-8`) or Windows (`English_United States.1252`) locale name.
    pub fn from_locale(name: &str) -> Result<Self> {
        let base = name.split(['.', '@']).next().unwrap_or_default().trim();
        if base.is_empty() || base.eq_ignore_ascii_case("C") || base.eq_ignore_ascii_case("POSIX")
        {
            return Ok(Self::C);
        }
        let (language, territory) = base.split_once(['_', '-']).unwrap_or((base, ""));
        let language = language.to_ascii_lowercase();
        let territory = territory.to_ascii_uppercase();
        let format = match (language.as_str(), territory.as_str()) {
            ("de" | "german", "CH" | "SWITZERLAND") => Self::APOSTROPHE_POINT,
            ("en" | "english" | "ja" | "japanese" | "zh" | "chinese" | "ko" | "korean", _) => {
                Self::COMMA_POINT
            }
            (
                "de" | "german" | "nl" | "dutch" | "it" | "italian" | "es" | "spanish" | "pt"
                | "portuguese" | "da" | "danish" | "tr" | "turkish",
                _,
            ) => Self::POINT_COMMA,
            (
                "fr" | "french" | "sv" | "swedish" | "nb" | "norwegian" | "fi" | "finnish" | "pl"
                | "polish" | "cs" | "czech" | "ru" | "russian" | "uk" | "ukrainian",
                _,
            ) => Self::SPACE_COMMA,
            _ => bail!("unsupported locale `{name}`"),
        };
        Ok(format)
    }

    /// Format the number with the fixed precision and the thousands grouping.
    #[must_use]
    pub fn format_fixed(self, value: f64, precision: usize) -> String {
        let digits = format!("{:.*}", precision, value.abs());
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

        let mut formatted = String::with_capacity(digits.len() + integer.len() / 3 + 1);
        if value < 0.0 {
            formatted.push('-');
        }
        for (i, digit) in integer.chars().enumerate() {
            if i != 0 && (integer.len() - i) % 3 == 0 {
                formatted.push_str(self.thousands_separator);
            }
            formatted.push(digit);
        }
        if !fraction.is_empty() {
            formatted.push_str(self.decimal_separator);
            formatted.push_str(fraction);
        }
        formatted
    }
}

/// Power scaled to a human-friendly magnitude: `42.50`, `-1.50 K`, `2.35 M`.
#[must_use]
pub struct FormattedPower {
    watts: Watts,
    format: NumberFormat,
}

impl FormattedPower {
    pub const fn new(watts: Watts, format: NumberFormat) -> Self {
        Self { watts, format }
    }
}

impl Display for FormattedPower {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let magnitude = self.watts.0.abs();
        let (scaled, suffix) = if magnitude > 1_000_000.0 {
            (magnitude / 1_000_000.0, " M")
        } else if magnitude > 1_000.0 {
            (magnitude / 1_000.0, " K")
        } else {
            (magnitude, "")
        };
        let signed = if self.watts.0 >= 0.0 { scaled } else { -scaled };
        write!(f, "{}{suffix}", self.format.format_fixed(signed, 2))
    }
}

impl Debug for FormattedPower {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
