use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("INR")
    }
}

/// Where grouping separators fall in the integer part.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DigitGrouping {
    /// Thousands: 1,234,567.
    Western,
    /// Thousand then lakh/crore pairs: 12,34,567.
    Indian,
}

/// Locale-aware number formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub grouping_separator: char,
    pub grouping: DigitGrouping,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-IN".into(),
            grouping_separator: ',',
            grouping: DigitGrouping::Indian,
        }
    }
}

impl LocaleConfig {
    pub fn western() -> Self {
        Self {
            language_tag: "en-US".into(),
            grouping_separator: ',',
            grouping: DigitGrouping::Western,
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "INR" => "₹".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        _ => code.into(),
    }
}

pub fn format_whole_number(locale: &LocaleConfig, value: i64) -> String {
    format_digit_run(locale, value < 0, &value.unsigned_abs().to_string())
}

/// Groups an arbitrary-length run of ASCII digits, for amounts that do not
/// fit a machine integer.
pub fn format_digit_run(locale: &LocaleConfig, negative: bool, digits: &str) -> String {
    let grouped = group_digits(digits, locale.grouping_separator, locale.grouping);
    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn group_digits(digits: &str, separator: char, grouping: DigitGrouping) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        let boundary = match grouping {
            DigitGrouping::Western => count != 0 && count % 3 == 0,
            DigitGrouping::Indian => count == 3 || (count > 3 && (count - 3) % 2 == 0),
        };
        if boundary {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// Renders a whole amount with the currency glyph prefixed, e.g. `₹5,00,000`.
pub fn format_currency_digits(
    negative: bool,
    digits: &str,
    code: &CurrencyCode,
    locale: &LocaleConfig,
) -> String {
    format!(
        "{}{}",
        symbol_for(code.as_str()),
        format_digit_run(locale, negative, digits)
    )
}
