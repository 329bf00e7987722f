use chrono::NaiveDate;
use quote_wizard::{
    age, fields::keys, outbound_link, render_message, AppConfig, FieldStore, Submission,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn first_time_store() -> FieldStore {
    [
        (keys::FULL_NAME, "Ravi Kumar"),
        (keys::MOBILE_NUMBER, "9123456780"),
        (keys::REGISTRATION_NUMBER, "GJ01AB1234"),
        (keys::VEHICLE_MAKE, "Tata"),
        (keys::VEHICLE_MODEL, "Nexon"),
        (keys::YEAR_OF_MANUFACTURE, "2023"),
        (keys::FUEL_TYPE, "Electric"),
        (keys::CUBIC_CAPACITY, "1"),
        (keys::VEHICLE_TYPE, "Private Car"),
        (keys::IDV, "1499999"),
        (keys::DATE_OF_REGISTRATION, "2023-01-20"),
        (keys::HAS_PREVIOUS_POLICY, "No"),
        (keys::INSURANCE_TYPE, "Third Party"),
    ]
    .into_iter()
    .collect()
}

#[test]
fn first_time_policy_message_omits_previous_details() {
    let message = render_message(&first_time_store(), &AppConfig::default(), date(2024, 6, 1));

    assert!(message.contains("Previous Policy Details: No\nFirst Time Policy: Yes"));
    assert!(!message.contains("Previous Insurer"));
    assert!(!message.contains("Policy Expiry"));
    assert!(!message.contains("NCB:"));
    assert!(message.contains("Make/Model: Tata Nexon"));
    assert!(message.contains("IDV: ₹14,99,999"));
    assert!(message.contains("Email: Not provided"));
    assert!(message.contains("Age: Not provided"));
    assert!(message.ends_with("Thank you,\nRavi Kumar"));
}

#[test]
fn company_name_comes_from_config() {
    let config = AppConfig {
        company_name: "Harbor Motor Cover".into(),
        ..AppConfig::default()
    };
    let message = render_message(&first_time_store(), &config, date(2024, 6, 1));
    assert!(message.starts_with("*VEHICLE INSURANCE QUOTE REQUEST*\n*Harbor Motor Cover*\n"));
}

#[test]
fn age_line_reflects_birthday_boundary() {
    let mut store = first_time_store();
    store.set(keys::DATE_OF_BIRTH, "1985-12-31");

    let before = render_message(&store, &AppConfig::default(), date(2024, 12, 30));
    assert!(before.contains("Age: 38 years"));
    let on = render_message(&store, &AppConfig::default(), date(2024, 12, 31));
    assert!(on.contains("Age: 39 years"));

    assert_eq!(age(date(1985, 12, 31), date(2025, 1, 1)), 39);
}

#[test]
fn link_targets_configured_number() {
    let config = AppConfig {
        country_code: "44".into(),
        business_number: "2071234567".into(),
        ..AppConfig::default()
    };
    let link = outbound_link(&config, "Hi & bye");
    assert_eq!(link, "https://wa.me/442071234567?text=Hi%20%26%20bye");
}

#[test]
fn submission_carries_configured_delay() {
    let config = AppConfig {
        submit_delay_ms: 250,
        ..AppConfig::default()
    };
    let submission = Submission::build(&first_time_store(), &config, date(2024, 6, 1));
    assert_eq!(submission.delay.as_millis(), 250);
    let encoded = submission.link.split_once("?text=").unwrap().1;
    let decoded = urlencoding::decode(encoded).unwrap();
    assert_eq!(decoded, submission.message);
}
