//! Static business configuration: who receives the quote request and which
//! options the choice fields offer.
//!
//! None of these values change core behaviour beyond populating choice
//! lists and the outbound message; a JSON file may override any subset of
//! them.

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::currency::{CurrencyCode, LocaleConfig};
use crate::errors::ConfigError;
use crate::fields::{keys, YES_NO};

/// Inclusive range of selectable manufacture years, newest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearRange {
    pub newest: u16,
    pub oldest: u16,
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            newest: 2025,
            oldest: 2010,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub company_name: String,
    pub business_number: String,
    pub country_code: String,
    pub vehicle_makes: Vec<String>,
    pub ncb_options: Vec<String>,
    pub fuel_types: Vec<String>,
    pub vehicle_types: Vec<String>,
    pub insurance_types: Vec<String>,
    pub insurance_statuses: Vec<String>,
    pub manufacture_years: YearRange,
    pub submit_delay_ms: u64,
    pub currency: CurrencyCode,
    pub locale: LocaleConfig,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            company_name: "Navkar Insurance Services".into(),
            business_number: "9408694686".into(),
            country_code: "91".into(),
            vehicle_makes: owned(&[
                "Maruti Suzuki",
                "Hyundai",
                "Tata",
                "Mahindra",
                "Toyota",
                "Honda",
                "Ford",
                "Renault",
                "Kia",
                "MG",
                "Nissan",
                "Skoda",
                "Volkswagen",
                "BMW",
                "Mercedes-Benz",
                "Audi",
                "Others",
            ]),
            ncb_options: owned(&["0%", "20%", "25%", "35%", "45%", "50%"]),
            fuel_types: owned(&["Petrol", "Diesel", "CNG", "Electric"]),
            vehicle_types: owned(&["Private Car", "Two Wheeler", "Commercial Vehicle"]),
            insurance_types: owned(&["Comprehensive", "Third Party"]),
            insurance_statuses: owned(&["Active", "Expired"]),
            manufacture_years: YearRange::default(),
            submit_delay_ms: 1000,
            currency: CurrencyCode::default(),
            locale: LocaleConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads a JSON configuration file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_digits(&self.business_number) {
            return Err(ConfigError::Invalid(format!(
                "business number `{}` must contain only digits",
                self.business_number
            )));
        }
        if !is_digits(&self.country_code) {
            return Err(ConfigError::Invalid(format!(
                "country code `{}` must contain only digits",
                self.country_code
            )));
        }
        if self.manufacture_years.newest < self.manufacture_years.oldest {
            return Err(ConfigError::Invalid(format!(
                "manufacture years run backwards ({} < {})",
                self.manufacture_years.newest, self.manufacture_years.oldest
            )));
        }
        Ok(())
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn year_options(&self) -> Vec<String> {
        (self.manufacture_years.oldest..=self.manufacture_years.newest)
            .rev()
            .map(|year| year.to_string())
            .collect()
    }

    /// Option list for a choice-style field, or `None` for free entry.
    pub fn choices_for(&self, key: &str) -> Option<Vec<String>> {
        let options = match key {
            keys::HAS_PREVIOUS_POLICY => owned(&YES_NO),
            keys::VEHICLE_MAKE => self.vehicle_makes.clone(),
            keys::YEAR_OF_MANUFACTURE => self.year_options(),
            keys::FUEL_TYPE => self.fuel_types.clone(),
            keys::VEHICLE_TYPE => self.vehicle_types.clone(),
            keys::INSURANCE_TYPE => self.insurance_types.clone(),
            keys::INSURANCE_STATUS => self.insurance_statuses.clone(),
            keys::NCB => self.ncb_options.clone(),
            _ => return None,
        };
        Some(options)
    }
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_years_run_newest_first() {
        let years = AppConfig::default().year_options();
        assert_eq!(years.first().map(String::as_str), Some("2025"));
        assert_eq!(years.last().map(String::as_str), Some("2010"));
        assert_eq!(years.len(), 16);
    }

    #[test]
    fn choices_cover_radio_groups() {
        let config = AppConfig::default();
        assert_eq!(
            config.choices_for(keys::HAS_PREVIOUS_POLICY),
            Some(vec!["Yes".to_string(), "No".to_string()])
        );
        assert!(config.choices_for(keys::FULL_NAME).is_none());
    }

    #[test]
    fn validate_rejects_non_digit_numbers() {
        let config = AppConfig {
            business_number: "94086-94686".into(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
