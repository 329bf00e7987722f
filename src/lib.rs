#![doc(test(attr(deny(warnings))))]

//! Quote Wizard collects vehicle-insurance quote details across a fixed
//! four-step form, validates each step before moving forward, and turns the
//! answers into a review summary and a pre-filled chat message link.

pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod fields;
pub mod message;
pub mod session;
pub mod steps;
pub mod summary;
pub mod utils;
pub mod validation;

pub use config::AppConfig;
pub use errors::{ConfigError, WizardError};
pub use fields::{FieldKind, FieldStore, FieldValue};
pub use message::{age, outbound_link, render_message, Submission};
pub use session::QuoteSession;
pub use steps::Step;
pub use summary::{render_summary, ReviewSummary};
pub use validation::{validate_field, validate_step, ValidationError, ValidationErrorKind};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Quote Wizard tracing initialized.");
    });
}
