//! Terminal front-end for the quote wizard.

pub mod output;
pub mod runner;
pub mod terminal;

pub use runner::{
    PromptContext, PromptResponse, ReviewResponse, WizardInteraction, WizardResult, WizardRunner,
};
pub use terminal::TerminalInteraction;
