use thiserror::Error;

use crate::steps::Step;
use crate::validation::StepValidation;

/// Navigation and submission failures raised by a quote session.
///
/// All variants are recoverable: the session state is left untouched when
/// one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("Step {0} does not exist (expected 1 to 4)")]
    UnknownStep(u8),
    #[error("Step {target} cannot be reached from step {current}")]
    StepNotReachable { current: Step, target: Step },
    #[error(
        "Step {step} has {count} field(s) that need attention",
        step = .0.step,
        count = .0.invalid_count()
    )]
    StepIncomplete(StepValidation),
    #[error("The quote can only be submitted from the review step (current step {0})")]
    NotAtReview(Step),
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Failures while loading application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
