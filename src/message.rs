//! Outbound quote-request message and the chat link that carries it.

use std::time::Duration;

use chrono::{Datelike, NaiveDate};

use crate::config::AppConfig;
use crate::currency::{format_digit_run, symbol_for};
use crate::fields::{keys, FieldStore};
use crate::validation::leading_integer;

const CHAT_BASE_URL: &str = "https://wa.me/";

/// Full years between `birth_date` and `today`, one less when this year's
/// birthday has not been reached yet.
pub fn age(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }
    years
}

fn text_or(store: &FieldStore, key: &str, placeholder: &str) -> String {
    match store.get(key) {
        Some(value) if value.is_filled() => value.to_string(),
        _ => placeholder.to_string(),
    }
}

fn age_line(store: &FieldStore, today: NaiveDate) -> String {
    let years = store
        .filled_text(keys::DATE_OF_BIRTH)
        .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
        .map(|birth| age(birth, today))
        .filter(|years| *years > 0);
    match years {
        Some(years) => format!("Age: {years} years"),
        None => "Age: Not provided".to_string(),
    }
}

fn idv_line(store: &FieldStore, config: &AppConfig) -> String {
    let amount = match store.filled_text(keys::IDV) {
        Some(raw) => match leading_integer(raw) {
            Some((negative, digits)) => format_digit_run(&config.locale, negative, digits),
            None => raw.to_string(),
        },
        None => "N/A".to_string(),
    };
    format!("IDV: {}{}", symbol_for(config.currency.as_str()), amount)
}

/// Renders the fixed-template quote request. Previous-policy details are
/// only included when `hasPreviousPolicy` is "Yes"; "No" adds a first-time
/// marker instead.
pub fn render_message(store: &FieldStore, config: &AppConfig, today: NaiveDate) -> String {
    let mut lines = vec![
        "*VEHICLE INSURANCE QUOTE REQUEST*".to_string(),
        format!("*{}*", config.company_name),
        String::new(),
        "*Customer Details:*".to_string(),
        format!("Name: {}", text_or(store, keys::FULL_NAME, "N/A")),
        format!("Mobile: {}", text_or(store, keys::MOBILE_NUMBER, "N/A")),
        format!("Email: {}", text_or(store, keys::EMAIL, "Not provided")),
        age_line(store, today),
        String::new(),
        "*Vehicle Details:*".to_string(),
        format!(
            "Registration No: {}",
            text_or(store, keys::REGISTRATION_NUMBER, "N/A")
        ),
        format!(
            "Make/Model: {} {}",
            text_or(store, keys::VEHICLE_MAKE, "N/A"),
            text_or(store, keys::VEHICLE_MODEL, "N/A")
        ),
        format!("Year: {}", text_or(store, keys::YEAR_OF_MANUFACTURE, "N/A")),
        format!("Fuel Type: {}", text_or(store, keys::FUEL_TYPE, "N/A")),
        format!("CC: {}", text_or(store, keys::CUBIC_CAPACITY, "N/A")),
        format!("Vehicle Type: {}", text_or(store, keys::VEHICLE_TYPE, "N/A")),
        idv_line(store, config),
        format!(
            "Registration Date: {}",
            text_or(store, keys::DATE_OF_REGISTRATION, "N/A")
        ),
        String::new(),
        "*Policy Details:*".to_string(),
        format!(
            "Insurance Type: {}",
            text_or(store, keys::INSURANCE_TYPE, "N/A")
        ),
        format!(
            "Previous Policy Details: {}",
            text_or(store, keys::HAS_PREVIOUS_POLICY, "N/A")
        ),
    ];

    match store.text(keys::HAS_PREVIOUS_POLICY) {
        Some("Yes") => {
            let expired = if store.is_filled(keys::POLICY_EXPIRED_90_DAYS) {
                "Yes"
            } else {
                "No"
            };
            lines.extend([
                format!(
                    "Current Status: {}",
                    text_or(store, keys::INSURANCE_STATUS, "N/A")
                ),
                format!(
                    "Previous Insurer: {}",
                    text_or(store, keys::PREVIOUS_INSURER, "Not provided")
                ),
                format!(
                    "Policy Expiry: {}",
                    text_or(store, keys::POLICY_EXPIRY_DATE, "Not provided")
                ),
                format!("Policy Expired 90+ days ago: {expired}"),
                format!("NCB: {}", text_or(store, keys::NCB, "Not provided")),
                format!(
                    "Claims in Last 3 Years: {}",
                    text_or(store, keys::CLAIMS_LAST_THREE_YEARS, "0")
                ),
            ]);
        }
        Some("No") => lines.push("First Time Policy: Yes".to_string()),
        _ => {}
    }

    lines.extend([
        String::new(),
        "Please provide quotation for the above details.".to_string(),
        String::new(),
        "Thank you,".to_string(),
        text_or(store, keys::FULL_NAME, "Customer"),
    ]);

    lines.join("\n")
}

/// `https://wa.me/<country><number>?text=<encoded message>`.
pub fn outbound_link(config: &AppConfig, message: &str) -> String {
    format!(
        "{}{}{}?text={}",
        CHAT_BASE_URL,
        config.country_code,
        config.business_number,
        urlencoding::encode(message)
    )
}

/// Everything the presentation layer needs to hand the request off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub message: String,
    pub link: String,
    /// Pause between confirming and opening the link.
    pub delay: Duration,
}

impl Submission {
    pub fn build(store: &FieldStore, config: &AppConfig, today: NaiveDate) -> Self {
        let message = render_message(store, config, today);
        let link = outbound_link(config, &message);
        Self {
            message,
            link,
            delay: config.submit_delay(),
        }
    }
}
