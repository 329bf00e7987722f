//! Quote session: owns the field store and the current step, and gates
//! forward navigation on step validation.
//!
//! A session is a plain value with no ambient globals. Every operation is
//! synchronous and completes before the next input event is applied.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::errors::WizardError;
use crate::fields::{
    descriptor, is_previous_policy_field, keys, FieldStore, FieldValue, PREVIOUS_POLICY_FIELDS,
};
use crate::message::Submission;
use crate::steps::{Step, StepIndicator};
use crate::summary::{render_summary_with, ReviewSummary, SummarySection};
use crate::validation::{validate_step, StepValidation};

#[derive(Debug, Clone)]
pub struct QuoteSession {
    store: FieldStore,
    current: Step,
    config: AppConfig,
    review: Option<ReviewSummary>,
    last_validation: Option<StepValidation>,
}

impl Default for QuoteSession {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl QuoteSession {
    pub fn new(config: AppConfig) -> Self {
        Self::with_store(config, FieldStore::new())
    }

    /// Starts at step 1 with pre-filled answers. A "No" previous-policy
    /// answer drops any dependent fields the store carries.
    pub fn with_store(config: AppConfig, store: FieldStore) -> Self {
        let mut session = Self {
            store,
            current: Step::FIRST,
            config,
            review: None,
            last_validation: None,
        };
        session.apply_previous_policy_toggle();
        session
    }

    pub fn current_step(&self) -> Step {
        self.current
    }

    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Summary rendered on the most recent entry into the review step.
    pub fn review(&self) -> Option<&ReviewSummary> {
        self.review.as_ref()
    }

    /// Result of the last blocked advance, cleared once an advance succeeds.
    pub fn last_validation(&self) -> Option<&StepValidation> {
        self.last_validation.as_ref()
    }

    /// Records user input for a catalogued field.
    ///
    /// Registration numbers are uppercased and stripped of separators and
    /// mobile numbers keep digits only. Answering "No" to
    /// `hasPreviousPolicy` drops every previous-policy field from the store,
    /// and later input for those fields is ignored until the answer changes.
    pub fn update_field(
        &mut self,
        key: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), WizardError> {
        let field = descriptor(key).ok_or_else(|| WizardError::UnknownField(key.to_string()))?;
        if self.previous_policy_declined() && is_previous_policy_field(field.key) {
            debug!(field = field.key, "previous policy declined, input ignored");
            return Ok(());
        }
        let value = normalize_input(field.key, value.into());
        debug!(field = field.key, "field updated");
        self.store.set(field.key, value);

        if field.key == keys::HAS_PREVIOUS_POLICY {
            self.apply_previous_policy_toggle();
        }
        Ok(())
    }

    /// Removes a field's value, e.g. when the user clears an input.
    pub fn clear_field(&mut self, key: &str) -> Option<FieldValue> {
        self.store.remove(key)
    }

    fn previous_policy_declined(&self) -> bool {
        self.store.text(keys::HAS_PREVIOUS_POLICY) == Some("No")
    }

    fn apply_previous_policy_toggle(&mut self) {
        if self.previous_policy_declined() {
            self.store.clear(PREVIOUS_POLICY_FIELDS);
            debug!("previous policy declined, dependent fields cleared");
        }
    }

    pub fn validate_current(&self) -> StepValidation {
        validate_step(self.current, &self.store)
    }

    /// Moves to the next step when the current one validates. On the review
    /// step this succeeds without moving.
    pub fn advance(&mut self) -> Result<Step, WizardError> {
        let validation = self.validate_current();
        if !validation.is_valid() {
            warn!(
                step = %self.current,
                invalid = validation.invalid_count(),
                "validation failed, not advancing"
            );
            self.last_validation = Some(validation.clone());
            return Err(WizardError::StepIncomplete(validation));
        }

        self.last_validation = None;
        if let Some(next) = self.current.next() {
            self.enter(next);
        } else {
            self.enter(self.current);
        }
        Ok(self.current)
    }

    /// Moves back one step without validation; a no-op on step 1.
    pub fn retreat(&mut self) -> Step {
        if let Some(previous) = self.current.previous() {
            self.enter(previous);
        }
        self.current
    }

    /// Jumps to step `number`. Visited steps are reachable unconditionally,
    /// the immediately following step only through [`advance`], and
    /// anything further is refused.
    ///
    /// [`advance`]: QuoteSession::advance
    pub fn jump_to(&mut self, number: u8) -> Result<Step, WizardError> {
        let target = Step::from_number(number).ok_or(WizardError::UnknownStep(number))?;
        if target <= self.current {
            self.enter(target);
            return Ok(self.current);
        }
        if Some(target) == self.current.next() {
            return self.advance();
        }
        warn!(current = %self.current, target = %target, "refusing to skip steps");
        Err(WizardError::StepNotReachable {
            current: self.current,
            target,
        })
    }

    /// Follows a review section's "Edit" link.
    pub fn edit_section(&mut self, section: &SummarySection) -> Result<Step, WizardError> {
        self.jump_to(section.step.number())
    }

    fn enter(&mut self, step: Step) {
        debug!(from = %self.current, to = %step, "moving to step");
        self.current = step;
        if step == Step::Review {
            self.review = Some(render_summary_with(
                &self.store,
                &self.config.currency,
                &self.config.locale,
            ));
        }
    }

    pub fn can_retreat(&self) -> bool {
        self.current > Step::FIRST
    }

    pub fn is_review(&self) -> bool {
        self.current == Step::Review
    }

    pub fn progress_percent(&self) -> u8 {
        let percent = u16::from(self.current.number()) * 100 / u16::from(Step::COUNT);
        percent as u8
    }

    pub fn indicator(&self, step: Step) -> StepIndicator {
        StepIndicator::for_step(step, self.current)
    }

    /// Builds the outbound message and link. Only allowed from the review
    /// step.
    pub fn submit(&self, today: NaiveDate) -> Result<Submission, WizardError> {
        if !self.is_review() {
            return Err(WizardError::NotAtReview(self.current));
        }
        let submission = Submission::build(&self.store, &self.config, today);
        info!(
            chars = submission.message.len(),
            "quote request prepared for submission"
        );
        Ok(submission)
    }
}

fn normalize_input(key: &str, value: FieldValue) -> FieldValue {
    let text = match value {
        FieldValue::Text(text) => text,
        flag => return flag,
    };
    let normalized = match key {
        keys::REGISTRATION_NUMBER => text
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|ch| ch.to_ascii_uppercase())
            .collect(),
        keys::MOBILE_NUMBER => text.chars().filter(char::is_ascii_digit).collect(),
        _ => text,
    };
    FieldValue::Text(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    fn fill_personal(session: &mut QuoteSession) {
        session.update_field(keys::FULL_NAME, "Asha Rao").unwrap();
        session.update_field(keys::MOBILE_NUMBER, "9876543210").unwrap();
    }

    fn fill_vehicle(session: &mut QuoteSession) {
        for (key, value) in [
            (keys::REGISTRATION_NUMBER, "mh12ab1234"),
            (keys::VEHICLE_MAKE, "Hyundai"),
            (keys::VEHICLE_MODEL, "Creta"),
            (keys::YEAR_OF_MANUFACTURE, "2021"),
            (keys::FUEL_TYPE, "Petrol"),
            (keys::CUBIC_CAPACITY, "1497"),
            (keys::VEHICLE_TYPE, "Private Car"),
            (keys::IDV, "750000"),
            (keys::DATE_OF_REGISTRATION, "2021-03-10"),
        ] {
            session.update_field(key, value).unwrap();
        }
    }

    #[test]
    fn starts_on_first_step() {
        let session = QuoteSession::default();
        assert_eq!(session.current_step(), Step::Personal);
        assert!(!session.can_retreat());
        assert_eq!(session.progress_percent(), 25);
    }

    #[test]
    fn advance_blocks_until_step_is_valid() {
        let mut session = QuoteSession::default();
        let err = session.advance().unwrap_err();
        match err {
            WizardError::StepIncomplete(validation) => {
                assert_eq!(validation.step, Step::Personal);
                assert_eq!(validation.invalid_count(), 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(session.current_step(), Step::Personal);
        assert!(session.last_validation().is_some());

        fill_personal(&mut session);
        assert_eq!(session.advance().unwrap(), Step::Vehicle);
        assert!(session.last_validation().is_none());
    }

    #[test]
    fn blocked_advance_keeps_entered_data() {
        let mut session = QuoteSession::default();
        session.update_field(keys::FULL_NAME, "Asha Rao").unwrap();
        assert!(session.advance().is_err());
        assert_eq!(session.store().text(keys::FULL_NAME), Some("Asha Rao"));
    }

    #[test]
    fn retreat_is_unconditional_and_floors_at_one() {
        let mut session = QuoteSession::default();
        assert_eq!(session.retreat(), Step::Personal);
        fill_personal(&mut session);
        session.advance().unwrap();
        assert_eq!(session.retreat(), Step::Personal);
    }

    #[test]
    fn jump_rules() {
        let mut session = QuoteSession::default();
        assert_eq!(session.jump_to(0), Err(WizardError::UnknownStep(0)));
        assert_eq!(session.jump_to(5), Err(WizardError::UnknownStep(5)));
        assert!(matches!(
            session.jump_to(3),
            Err(WizardError::StepNotReachable {
                current: Step::Personal,
                target: Step::Policy
            })
        ));
        assert!(matches!(
            session.jump_to(2),
            Err(WizardError::StepIncomplete(_))
        ));

        fill_personal(&mut session);
        assert_eq!(session.jump_to(2).unwrap(), Step::Vehicle);
        assert_eq!(session.jump_to(1).unwrap(), Step::Personal);
    }

    #[test]
    fn normalizes_registration_and_mobile() {
        let mut session = QuoteSession::default();
        session
            .update_field(keys::REGISTRATION_NUMBER, "mh-12 ab 1234")
            .unwrap();
        session.update_field(keys::MOBILE_NUMBER, "98765 43210").unwrap();
        assert_eq!(
            session.store().text(keys::REGISTRATION_NUMBER),
            Some("MH12AB1234")
        );
        assert_eq!(session.store().text(keys::MOBILE_NUMBER), Some("9876543210"));
    }

    #[test]
    fn long_mobile_is_not_truncated() {
        let mut session = QuoteSession::default();
        session.update_field(keys::FULL_NAME, "Asha Rao").unwrap();
        session.update_field(keys::MOBILE_NUMBER, "98765432100").unwrap();
        let err = session.advance().unwrap_err();
        let WizardError::StepIncomplete(validation) = err else {
            panic!("expected incomplete step");
        };
        assert_eq!(
            validation.error_for(keys::MOBILE_NUMBER).map(|e| e.kind),
            Some(ValidationErrorKind::InvalidFormat)
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut session = QuoteSession::default();
        assert_eq!(
            session.update_field("favouriteColour", "blue"),
            Err(WizardError::UnknownField("favouriteColour".into()))
        );
    }

    #[test]
    fn declining_previous_policy_clears_dependents() {
        let mut session = QuoteSession::default();
        session.update_field(keys::HAS_PREVIOUS_POLICY, "Yes").unwrap();
        session.update_field(keys::INSURANCE_STATUS, "Active").unwrap();
        session.update_field(keys::PREVIOUS_INSURER, "Acme").unwrap();
        session.update_field(keys::POLICY_EXPIRY_DATE, "2024-01-01").unwrap();
        session.update_field(keys::NCB, "20%").unwrap();
        session.update_field(keys::CLAIMS_LAST_THREE_YEARS, "1").unwrap();
        session.update_field(keys::POLICY_EXPIRED_90_DAYS, true).unwrap();

        session.update_field(keys::HAS_PREVIOUS_POLICY, "No").unwrap();
        for key in PREVIOUS_POLICY_FIELDS {
            assert!(!session.store().contains(key), "{key} should be cleared");
        }
        assert_eq!(session.store().text(keys::HAS_PREVIOUS_POLICY), Some("No"));
    }

    #[test]
    fn dependents_entered_after_declining_are_ignored() {
        let mut session = QuoteSession::default();
        session.update_field(keys::HAS_PREVIOUS_POLICY, "No").unwrap();
        session.update_field(keys::PREVIOUS_INSURER, "Acme").unwrap();
        session.update_field(keys::NCB, "50%").unwrap();
        session.update_field(keys::POLICY_EXPIRED_90_DAYS, true).unwrap();

        for key in PREVIOUS_POLICY_FIELDS {
            assert!(!session.store().contains(key), "{key} should stay empty");
        }
        let lines = render_summary_with(
            session.store(),
            &session.config().currency,
            &session.config().locale,
        )
        .lines();
        assert_eq!(
            lines,
            vec!["Policy Details (step 3)", "  Has Previous Policy Details: No"]
        );

        session.update_field(keys::HAS_PREVIOUS_POLICY, "Yes").unwrap();
        session.update_field(keys::NCB, "50%").unwrap();
        assert_eq!(session.store().text(keys::NCB), Some("50%"));
    }

    #[test]
    fn prefilled_store_drops_dependents_when_declined() {
        let store: FieldStore = [
            (keys::HAS_PREVIOUS_POLICY, "No"),
            (keys::NCB, "50%"),
            (keys::FULL_NAME, "Asha Rao"),
        ]
        .into_iter()
        .collect();
        let session = QuoteSession::with_store(AppConfig::default(), store);
        assert!(!session.store().contains(keys::NCB));
        assert_eq!(session.store().text(keys::FULL_NAME), Some("Asha Rao"));

        let kept: FieldStore = [(keys::HAS_PREVIOUS_POLICY, "Yes"), (keys::NCB, "50%")]
            .into_iter()
            .collect();
        let session = QuoteSession::with_store(AppConfig::default(), kept);
        assert_eq!(session.store().text(keys::NCB), Some("50%"));
    }

    #[test]
    fn lowercase_previous_policy_answer_blocks_policy_step() {
        let mut session = QuoteSession::default();
        fill_personal(&mut session);
        session.advance().unwrap();
        fill_vehicle(&mut session);
        session.advance().unwrap();
        session.update_field(keys::HAS_PREVIOUS_POLICY, "yes").unwrap();
        session.update_field(keys::INSURANCE_TYPE, "Comprehensive").unwrap();

        let Err(WizardError::StepIncomplete(validation)) = session.advance() else {
            panic!("expected incomplete step");
        };
        assert_eq!(
            validation.error_for(keys::HAS_PREVIOUS_POLICY).map(|e| e.kind),
            Some(ValidationErrorKind::NoSelection)
        );
        assert_eq!(session.current_step(), Step::Policy);
    }

    #[test]
    fn policy_step_requires_status_with_previous_policy() {
        let mut session = QuoteSession::default();
        fill_personal(&mut session);
        session.advance().unwrap();
        fill_vehicle(&mut session);
        session.advance().unwrap();
        assert_eq!(session.current_step(), Step::Policy);

        session.update_field(keys::HAS_PREVIOUS_POLICY, "Yes").unwrap();
        session.update_field(keys::INSURANCE_TYPE, "Comprehensive").unwrap();
        let err = session.advance().unwrap_err();
        let WizardError::StepIncomplete(validation) = err else {
            panic!("expected incomplete step");
        };
        assert_eq!(
            validation.error_for(keys::INSURANCE_STATUS).map(|e| e.kind),
            Some(ValidationErrorKind::NoSelection)
        );

        session.update_field(keys::HAS_PREVIOUS_POLICY, "No").unwrap();
        assert_eq!(session.advance().unwrap(), Step::Review);
    }

    #[test]
    fn entering_review_renders_summary_and_enables_submit() {
        let mut session = QuoteSession::default();
        fill_personal(&mut session);
        session.advance().unwrap();
        fill_vehicle(&mut session);
        session.advance().unwrap();
        assert!(matches!(
            session.submit(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            Err(WizardError::NotAtReview(Step::Policy))
        ));
        session.update_field(keys::HAS_PREVIOUS_POLICY, "No").unwrap();
        session.update_field(keys::INSURANCE_TYPE, "Third Party").unwrap();
        session.advance().unwrap();

        assert!(session.is_review());
        assert_eq!(session.progress_percent(), 100);
        let review = session.review().expect("summary rendered").clone();
        assert_eq!(
            review.entry(keys::REGISTRATION_NUMBER).unwrap().value,
            "MH12AB1234"
        );
        assert_eq!(review.entry(keys::IDV).unwrap().value, "₹7,50,000");

        assert_eq!(session.advance().unwrap(), Step::Review);

        let vehicle = review.section(Step::Vehicle).unwrap().clone();
        assert_eq!(session.edit_section(&vehicle).unwrap(), Step::Vehicle);
        assert_eq!(session.indicator(Step::Personal), StepIndicator::Completed);
        assert_eq!(session.indicator(Step::Policy), StepIndicator::Pending);
    }
}
