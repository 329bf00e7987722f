//! Field catalog and the in-memory store backing a quote session.
//!
//! Every field the wizard knows about is described once in [`CATALOG`]: its
//! key, the label used on the review screen, the validation kind, and the
//! step that owns it. The kind is always explicit so validation never has to
//! guess from presentation markup.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::steps::Step;

/// Stable field identifiers shared by the store, validator, and formatters.
pub mod keys {
    pub const FULL_NAME: &str = "fullName";
    pub const MOBILE_NUMBER: &str = "mobileNumber";
    pub const EMAIL: &str = "email";
    pub const DATE_OF_BIRTH: &str = "dateOfBirth";

    pub const REGISTRATION_NUMBER: &str = "registrationNumber";
    pub const VEHICLE_MAKE: &str = "vehicleMake";
    pub const VEHICLE_MODEL: &str = "vehicleModel";
    pub const YEAR_OF_MANUFACTURE: &str = "yearOfManufacture";
    pub const FUEL_TYPE: &str = "fuelType";
    pub const CUBIC_CAPACITY: &str = "cubicCapacity";
    pub const VEHICLE_TYPE: &str = "vehicleType";
    pub const IDV: &str = "idv";
    pub const DATE_OF_REGISTRATION: &str = "dateOfRegistration";

    pub const HAS_PREVIOUS_POLICY: &str = "hasPreviousPolicy";
    pub const INSURANCE_TYPE: &str = "insuranceType";
    pub const INSURANCE_STATUS: &str = "insuranceStatus";
    pub const PREVIOUS_INSURER: &str = "previousInsurer";
    pub const POLICY_EXPIRY_DATE: &str = "policyExpiryDate";
    pub const POLICY_EXPIRED_90_DAYS: &str = "policyExpired90Days";
    pub const NCB: &str = "ncb";
    pub const CLAIMS_LAST_THREE_YEARS: &str = "claimsLastThreeYears";
}

/// Fields that only apply while `hasPreviousPolicy` is "Yes".
pub const PREVIOUS_POLICY_FIELDS: [&str; 6] = [
    keys::INSURANCE_STATUS,
    keys::PREVIOUS_INSURER,
    keys::POLICY_EXPIRY_DATE,
    keys::NCB,
    keys::CLAIMS_LAST_THREE_YEARS,
    keys::POLICY_EXPIRED_90_DAYS,
];

/// The only answers the previous-policy radio group produces.
pub const YES_NO: [&str; 2] = ["Yes", "No"];

/// Validation rule family applied to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Numeric,
    RegistrationNumber,
    Date,
    SingleChoice,
    Flag,
}

/// How a value is rendered on the review screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFormat {
    Plain,
    Currency,
    Boolean,
}

/// Declarative description of a single wizard field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub step: Step,
    /// Unconditionally required for the owning step. `insuranceStatus` is
    /// required only through the previous-policy branch.
    pub required: bool,
    pub format: SummaryFormat,
    pub help: Option<&'static str>,
    /// Closed option set for choices that never come from configuration.
    pub options: Option<&'static [&'static str]>,
}

const fn field(
    key: &'static str,
    label: &'static str,
    kind: FieldKind,
    step: Step,
    required: bool,
) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        kind,
        step,
        required,
        format: SummaryFormat::Plain,
        help: None,
        options: None,
    }
}

const fn with_format(mut descriptor: FieldDescriptor, format: SummaryFormat) -> FieldDescriptor {
    descriptor.format = format;
    descriptor
}

const fn with_options(
    mut descriptor: FieldDescriptor,
    options: &'static [&'static str],
) -> FieldDescriptor {
    descriptor.options = Some(options);
    descriptor
}

const fn with_help(mut descriptor: FieldDescriptor, help: &'static str) -> FieldDescriptor {
    descriptor.help = Some(help);
    descriptor
}

/// Ordered field catalog. Order within a step is the prompt order and the
/// review order.
pub static CATALOG: [FieldDescriptor; 21] = [
    field(keys::FULL_NAME, "Full Name", FieldKind::Text, Step::Personal, true),
    with_help(
        field(
            keys::MOBILE_NUMBER,
            "Mobile Number",
            FieldKind::Phone,
            Step::Personal,
            true,
        ),
        "10-digit mobile number without the country code.",
    ),
    field(keys::EMAIL, "Email Address", FieldKind::Email, Step::Personal, false),
    with_help(
        field(
            keys::DATE_OF_BIRTH,
            "Date of Birth",
            FieldKind::Date,
            Step::Personal,
            false,
        ),
        "Use YYYY-MM-DD.",
    ),
    with_help(
        field(
            keys::REGISTRATION_NUMBER,
            "Registration Number",
            FieldKind::RegistrationNumber,
            Step::Vehicle,
            true,
        ),
        "For example MH12AB1234.",
    ),
    field(keys::VEHICLE_MAKE, "Make", FieldKind::Text, Step::Vehicle, true),
    field(keys::VEHICLE_MODEL, "Model", FieldKind::Text, Step::Vehicle, true),
    field(
        keys::YEAR_OF_MANUFACTURE,
        "Year",
        FieldKind::Text,
        Step::Vehicle,
        true,
    ),
    field(
        keys::FUEL_TYPE,
        "Fuel Type",
        FieldKind::SingleChoice,
        Step::Vehicle,
        true,
    ),
    field(
        keys::CUBIC_CAPACITY,
        "Cubic Capacity (CC)",
        FieldKind::Numeric,
        Step::Vehicle,
        true,
    ),
    field(
        keys::VEHICLE_TYPE,
        "Vehicle Type",
        FieldKind::SingleChoice,
        Step::Vehicle,
        true,
    ),
    with_help(
        with_format(
            field(keys::IDV, "IDV", FieldKind::Numeric, Step::Vehicle, true),
            SummaryFormat::Currency,
        ),
        "Insured Declared Value in whole rupees.",
    ),
    field(
        keys::DATE_OF_REGISTRATION,
        "Registration Date",
        FieldKind::Date,
        Step::Vehicle,
        true,
    ),
    with_options(
        field(
            keys::HAS_PREVIOUS_POLICY,
            "Has Previous Policy Details",
            FieldKind::SingleChoice,
            Step::Policy,
            true,
        ),
        &YES_NO,
    ),
    field(
        keys::INSURANCE_TYPE,
        "Insurance Type",
        FieldKind::SingleChoice,
        Step::Policy,
        true,
    ),
    field(
        keys::INSURANCE_STATUS,
        "Current Status",
        FieldKind::SingleChoice,
        Step::Policy,
        false,
    ),
    field(
        keys::PREVIOUS_INSURER,
        "Previous Insurer",
        FieldKind::Text,
        Step::Policy,
        false,
    ),
    field(
        keys::POLICY_EXPIRY_DATE,
        "Policy Expiry Date",
        FieldKind::Date,
        Step::Policy,
        false,
    ),
    with_format(
        field(
            keys::POLICY_EXPIRED_90_DAYS,
            "Policy Expired >90 Days",
            FieldKind::Flag,
            Step::Policy,
            false,
        ),
        SummaryFormat::Boolean,
    ),
    with_help(
        field(keys::NCB, "No Claim Bonus", FieldKind::Text, Step::Policy, false),
        "No Claim Bonus tier carried over from the previous policy.",
    ),
    field(
        keys::CLAIMS_LAST_THREE_YEARS,
        "Claims in Last 3 Years",
        FieldKind::Text,
        Step::Policy,
        false,
    ),
];

pub fn catalog() -> &'static [FieldDescriptor] {
    &CATALOG
}

pub fn descriptor(key: &str) -> Option<&'static FieldDescriptor> {
    CATALOG.iter().find(|field| field.key == key)
}

/// Catalog entries owned by `step`, in prompt order.
pub fn fields_for_step(step: Step) -> impl Iterator<Item = &'static FieldDescriptor> {
    CATALOG.iter().filter(move |field| field.step == step)
}

pub fn is_previous_policy_field(key: &str) -> bool {
    PREVIOUS_POLICY_FIELDS.contains(&key)
}

/// Whether `key` belongs to the branch selected by the current answers.
/// Previous-policy fields only count once a previous policy is declared.
pub fn in_active_branch(key: &str, store: &FieldStore) -> bool {
    !is_previous_policy_field(key) || store.text(keys::HAS_PREVIOUS_POLICY) == Some("Yes")
}

/// A stored field value: free text (inputs, selects, radio groups) or a
/// checkbox flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Flag(_) => None,
        }
    }

    /// True unless the value is an empty string or `false`.
    pub fn is_filled(&self) -> bool {
        match self {
            FieldValue::Text(text) => !text.is_empty(),
            FieldValue::Flag(flag) => *flag,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Flag(flag) => write!(f, "{flag}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// Mapping from field key to its current value. Absent keys are simply not
/// present in the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldStore {
    values: BTreeMap<String, FieldValue>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `key`, returning the previous value.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    /// Text value only when it is non-empty.
    pub fn filled_text(&self, key: &str) -> Option<&str> {
        self.text(key).filter(|text| !text.is_empty())
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(FieldValue::Flag(true)))
    }

    pub fn is_filled(&self, key: &str) -> bool {
        self.get(key).is_some_and(FieldValue::is_filled)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.values.remove(key)
    }

    /// Removes every listed key; missing keys are ignored.
    pub fn clear<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            self.values.remove(key.as_ref());
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for FieldStore
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut store = FieldStore::new();
        for (key, value) in iter {
            store.set(key, value);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_and_returns_previous() {
        let mut store = FieldStore::new();
        assert!(store.set(keys::FULL_NAME, "Asha").is_none());
        let previous = store.set(keys::FULL_NAME, "Asha Rao");
        assert_eq!(previous, Some(FieldValue::from("Asha")));
        assert_eq!(store.text(keys::FULL_NAME), Some("Asha Rao"));
    }

    #[test]
    fn clear_ignores_missing_keys() {
        let mut store: FieldStore = [(keys::NCB, "20%"), (keys::FULL_NAME, "Asha")]
            .into_iter()
            .collect();
        store.clear([keys::NCB, keys::PREVIOUS_INSURER]);
        assert!(!store.contains(keys::NCB));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn filled_excludes_empty_and_false() {
        let mut store = FieldStore::new();
        store.set(keys::EMAIL, "");
        store.set(keys::POLICY_EXPIRED_90_DAYS, false);
        assert!(!store.is_filled(keys::EMAIL));
        assert!(!store.is_filled(keys::POLICY_EXPIRED_90_DAYS));
        assert!(!store.is_filled(keys::NCB));

        store.set(keys::POLICY_EXPIRED_90_DAYS, true);
        assert!(store.is_filled(keys::POLICY_EXPIRED_90_DAYS));
        assert!(store.flag(keys::POLICY_EXPIRED_90_DAYS));
    }

    #[test]
    fn deserializes_strings_and_booleans() {
        let store: FieldStore =
            serde_json::from_str(r#"{"fullName":"Asha Rao","policyExpired90Days":true}"#)
                .unwrap();
        assert_eq!(store.text(keys::FULL_NAME), Some("Asha Rao"));
        assert_eq!(
            store.get(keys::POLICY_EXPIRED_90_DAYS),
            Some(&FieldValue::Flag(true))
        );
    }

    #[test]
    fn catalog_keys_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for field in catalog() {
            assert!(seen.insert(field.key), "duplicate key {}", field.key);
        }
    }

    #[test]
    fn previous_policy_branch_requires_yes() {
        let mut store = FieldStore::new();
        assert!(in_active_branch(keys::FULL_NAME, &store));
        assert!(!in_active_branch(keys::NCB, &store));
        store.set(keys::HAS_PREVIOUS_POLICY, "No");
        assert!(!in_active_branch(keys::NCB, &store));
        store.set(keys::HAS_PREVIOUS_POLICY, "Yes");
        assert!(in_active_branch(keys::NCB, &store));
    }

    #[test]
    fn previous_policy_fields_live_on_policy_step() {
        for key in PREVIOUS_POLICY_FIELDS {
            let field = descriptor(key).expect("catalogued");
            assert_eq!(field.step, Step::Policy);
            assert!(!field.required);
        }
    }
}
