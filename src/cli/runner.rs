//! Step-by-step driver that walks a [`QuoteSession`] through its prompts.
//!
//! The runner owns no terminal code: it asks a [`WizardInteraction`] for each
//! answer, so the same loop runs against dialoguer prompts or a scripted mock.

use chrono::NaiveDate;

use crate::cli::output;
use crate::errors::WizardError;
use crate::fields::{
    descriptor, fields_for_step, in_active_branch, FieldDescriptor, FieldStore, FieldValue,
};
use crate::message::Submission;
use crate::session::QuoteSession;
use crate::steps::Step;
use crate::summary::{render_summary_with, ReviewSummary};
use crate::validation::{validate_field, ValidationError};

/// Answer to a single field prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    /// Typed or selected text. An empty value clears the field.
    Value(String),
    /// Checkbox answer.
    Flag(bool),
    /// Keep the current value (or leave the field empty).
    Keep,
    /// Return to the previous field, or the previous step from the first one.
    Back,
    /// Abandon the wizard.
    Cancel,
}

/// Answer on the review screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewResponse {
    Confirm,
    Edit(Step),
    Back,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardResult {
    Submitted(Submission),
    Cancelled,
}

/// Data provided to render the current field.
pub struct PromptContext<'a> {
    pub descriptor: &'static FieldDescriptor,
    pub step: Step,
    pub current: Option<&'a FieldValue>,
    pub choices: Option<Vec<String>>,
    /// Message from the last blocked advance, if this field caused it.
    pub error: Option<&'a ValidationError>,
    pub index: usize,
    pub total: usize,
}

impl PromptContext<'_> {
    pub fn current_text(&self) -> Option<&str> {
        self.current.and_then(FieldValue::as_text)
    }
}

pub trait WizardInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse;

    fn review(&mut self, summary: &ReviewSummary, lines: &[String]) -> ReviewResponse;

    /// Called when a step header should be shown.
    fn step_started(&mut self, _step: Step, _progress: u8) {}
}

enum StepOutcome {
    Completed,
    Back,
    Cancelled,
}

enum FieldEvent {
    Moved,
    Repeat,
}

/// Drives a [`QuoteSession`] using a [`WizardInteraction`] implementation.
pub struct WizardRunner<'a> {
    session: &'a mut QuoteSession,
    today: NaiveDate,
}

impl<'a> WizardRunner<'a> {
    pub fn new(session: &'a mut QuoteSession, today: NaiveDate) -> Self {
        Self { session, today }
    }

    pub fn run<I: WizardInteraction>(
        &mut self,
        interaction: &mut I,
    ) -> Result<WizardResult, WizardError> {
        loop {
            let step = self.session.current_step();
            interaction.step_started(step, self.session.progress_percent());

            if step == Step::Review {
                let summary = match self.session.review() {
                    Some(summary) => summary.clone(),
                    None => render_summary_with(
                        self.session.store(),
                        &self.session.config().currency,
                        &self.session.config().locale,
                    ),
                };
                let lines = summary.lines();
                match interaction.review(&summary, &lines) {
                    ReviewResponse::Confirm => {
                        let submission = self.session.submit(self.today)?;
                        return Ok(WizardResult::Submitted(submission));
                    }
                    ReviewResponse::Edit(target) => {
                        self.session.jump_to(target.number())?;
                    }
                    ReviewResponse::Back => {
                        self.session.retreat();
                    }
                    ReviewResponse::Cancel => return Ok(WizardResult::Cancelled),
                }
                continue;
            }

            match self.collect_step(interaction) {
                StepOutcome::Completed => match self.session.advance() {
                    Ok(_) => {}
                    Err(WizardError::StepIncomplete(validation)) => {
                        for (key, err) in validation.errors() {
                            let label = descriptor(key)
                                .map(|field| field.label)
                                .unwrap_or(key);
                            output::warning(format!("{label}: {err}"));
                        }
                    }
                    Err(other) => return Err(other),
                },
                StepOutcome::Back => {
                    self.session.retreat();
                }
                StepOutcome::Cancelled => return Ok(WizardResult::Cancelled),
            }
        }
    }

    /// Fields to ask for on the current step: everything relevant, or only
    /// the offenders after a blocked advance.
    fn pending_fields(&self) -> Vec<&'static FieldDescriptor> {
        let step = self.session.current_step();
        let relevant = relevant_fields(step, self.session.store());
        match self.session.last_validation() {
            Some(validation) if validation.step == step && !validation.is_valid() => relevant
                .into_iter()
                .filter(|field| validation.error_for(field.key).is_some())
                .collect(),
            _ => relevant,
        }
    }

    fn collect_step<I: WizardInteraction>(&mut self, interaction: &mut I) -> StepOutcome {
        let step = self.session.current_step();
        let mut index = 0;
        loop {
            let fields = self.pending_fields();
            let Some(field) = fields.get(index).copied() else {
                return StepOutcome::Completed;
            };

            let response = {
                let context = PromptContext {
                    descriptor: field,
                    step,
                    current: self.session.store().get(field.key),
                    choices: self.session.config().choices_for(field.key),
                    error: self
                        .session
                        .last_validation()
                        .filter(|validation| validation.step == step)
                        .and_then(|validation| validation.error_for(field.key)),
                    index,
                    total: fields.len(),
                };
                interaction.prompt_field(&context)
            };

            match response {
                PromptResponse::Cancel => return StepOutcome::Cancelled,
                PromptResponse::Back => {
                    if index > 0 {
                        index -= 1;
                    } else if step > Step::FIRST {
                        return StepOutcome::Back;
                    } else {
                        output::warning("Already at the first field.");
                    }
                }
                other => match self.apply_response(field, other) {
                    FieldEvent::Moved => index += 1,
                    FieldEvent::Repeat => {}
                },
            }
        }
    }

    fn apply_response(
        &mut self,
        field: &'static FieldDescriptor,
        response: PromptResponse,
    ) -> FieldEvent {
        let result = match response {
            PromptResponse::Keep => Ok(()),
            PromptResponse::Flag(flag) => self.session.update_field(field.key, flag),
            PromptResponse::Value(raw) if raw.trim().is_empty() => {
                self.session.clear_field(field.key);
                Ok(())
            }
            PromptResponse::Value(raw) => {
                if let Some(err) = validate_field(field.key, &raw, field.kind).error {
                    output::warning(&err);
                    return FieldEvent::Repeat;
                }
                self.session.update_field(field.key, raw)
            }
            PromptResponse::Back | PromptResponse::Cancel => Ok(()),
        };
        match result {
            Ok(()) => FieldEvent::Moved,
            Err(err) => {
                output::warning(&err);
                FieldEvent::Repeat
            }
        }
    }
}

/// Catalog fields shown for `step` given the current answers; the
/// previous-policy group only appears once a previous policy is declared.
pub fn relevant_fields(step: Step, store: &FieldStore) -> Vec<&'static FieldDescriptor> {
    fields_for_step(step)
        .filter(|field| in_active_branch(field.key, store))
        .collect()
}
