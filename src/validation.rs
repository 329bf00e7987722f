//! Field- and step-level validation.
//!
//! Everything here is a pure function of its inputs. A failed check produces
//! a [`ValidationError`] attached to the offending field; nothing in this
//! module is fatal and no entered data is ever discarded.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::fields::{
    descriptor, fields_for_step, keys, FieldDescriptor, FieldKind, FieldStore, FieldValue,
};
use crate::steps::Step;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone pattern"));

static REGISTRATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{2}[0-9]{1,2}[A-Z]{1,2}[0-9]{4}$").expect("valid registration pattern")
});

/// Failure categories for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    EmptyField,
    InvalidFormat,
    InvalidValue,
    NoSelection,
}

/// Field-level validation failure with the message shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    fn empty() -> Self {
        Self::new(ValidationErrorKind::EmptyField, "This field is required")
    }

    fn no_selection() -> Self {
        Self::new(ValidationErrorKind::NoSelection, "Please select an option")
    }

    fn format(message: &str) -> Self {
        Self::new(ValidationErrorKind::InvalidFormat, message)
    }
}

/// Outcome of validating one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidation {
    pub key: String,
    pub error: Option<ValidationError>,
}

impl FieldValidation {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn message(&self) -> Option<&str> {
        self.error.as_ref().map(|err| err.message.as_str())
    }
}

/// Per-field results for every required field of a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepValidation {
    pub step: Step,
    pub fields: Vec<FieldValidation>,
}

impl StepValidation {
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(FieldValidation::is_valid)
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &ValidationError)> {
        self.fields
            .iter()
            .filter_map(|field| field.error.as_ref().map(|err| (field.key.as_str(), err)))
    }

    pub fn error_for(&self, key: &str) -> Option<&ValidationError> {
        self.fields
            .iter()
            .find(|field| field.key == key)
            .and_then(|field| field.error.as_ref())
    }

    pub fn invalid_count(&self) -> usize {
        self.errors().count()
    }
}

/// Sign and digit run of the leading integer in `raw`, read the way a
/// lenient numeric input does: surrounding whitespace and trailing garbage
/// are ignored (`"1500.75"` reads as 1500), but at least one digit must
/// lead. Leading zeros are dropped, so the run is never longer than needed.
pub fn leading_integer(raw: &str) -> Option<(bool, &str)> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    let digits = rest[..len].trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    Some((negative && digits != "0", digits))
}

/// Leading integer of `raw`, saturating at the `i64` bounds.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let (negative, digits) = leading_integer(raw)?;
    // An all-digit run only fails to parse on overflow.
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Applies the rules for `kind` to a raw value.
pub fn check_value(raw: &str, kind: FieldKind) -> Result<(), ValidationError> {
    let value = raw.trim();
    match kind {
        FieldKind::Flag => return Ok(()),
        FieldKind::SingleChoice => {
            return if value.is_empty() {
                Err(ValidationError::no_selection())
            } else {
                Ok(())
            };
        }
        _ if value.is_empty() => return Err(ValidationError::empty()),
        _ => {}
    }

    match kind {
        FieldKind::Email if !EMAIL_PATTERN.is_match(value) => Err(ValidationError::format(
            "Please enter a valid email address",
        )),
        FieldKind::Phone if !PHONE_PATTERN.is_match(value) => Err(ValidationError::format(
            "Please enter a valid 10-digit mobile number",
        )),
        FieldKind::Numeric => match parse_leading_int(value) {
            Some(number) if number > 0 => Ok(()),
            _ => Err(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                "Please enter a valid number",
            )),
        },
        FieldKind::RegistrationNumber
            if !REGISTRATION_PATTERN.is_match(&value.to_uppercase()) =>
        {
            Err(ValidationError::format(
                "Please enter a valid registration number (e.g., MH12AB1234)",
            ))
        }
        FieldKind::Date if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() => Err(
            ValidationError::format("Please enter a valid date (YYYY-MM-DD)"),
        ),
        _ => Ok(()),
    }
}

/// Validates `raw` for `key`. Choices with a closed option set (the Yes/No
/// previous-policy group) only accept one of those options.
pub fn validate_field(key: &str, raw: &str, kind: FieldKind) -> FieldValidation {
    let options = descriptor(key).and_then(|field| field.options);
    let error = check_value(raw, kind).err().or_else(|| match options {
        Some(options) if !options.contains(&raw.trim()) => Some(ValidationError::no_selection()),
        _ => None,
    });
    FieldValidation {
        key: key.to_string(),
        error,
    }
}

/// Required fields for `step` given the current answers. The policy step
/// also requires `insuranceStatus` once a previous policy is declared.
pub fn required_fields(step: Step, store: &FieldStore) -> Vec<&'static FieldDescriptor> {
    let has_previous_policy = store.text(keys::HAS_PREVIOUS_POLICY) == Some("Yes");
    fields_for_step(step)
        .filter(|field| {
            field.required || (field.key == keys::INSURANCE_STATUS && has_previous_policy)
        })
        .collect()
}

pub fn validate_step(step: Step, store: &FieldStore) -> StepValidation {
    let fields: Vec<FieldValidation> = required_fields(step, store)
        .into_iter()
        .map(|field| {
            let raw = match store.get(field.key) {
                Some(FieldValue::Text(text)) => text.as_str(),
                Some(FieldValue::Flag(true)) => "true",
                Some(FieldValue::Flag(false)) | None => "",
            };
            let result = validate_field(field.key, raw, field.kind);
            if let Some(err) = &result.error {
                debug!(step = %step, field = field.key, reason = %err, "field failed validation");
            }
            result
        })
        .collect();

    let validation = StepValidation { step, fields };
    debug!(
        step = %step,
        valid = validation.is_valid(),
        "step validation finished"
    );
    validation
}
