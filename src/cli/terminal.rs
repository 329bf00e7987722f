use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::cli::output;
use crate::cli::runner::{PromptContext, PromptResponse, ReviewResponse, WizardInteraction};
use crate::fields::FieldKind;
use crate::steps::Step;
use crate::summary::ReviewSummary;

const BACK_LABEL: &str = "← Back";
const BACK_COMMAND: &str = ":back";
const CANCEL_COMMAND: &str = ":cancel";

/// Dialoguer-backed prompts for an interactive terminal.
pub struct TerminalInteraction {
    theme: ColorfulTheme,
}

impl Default for TerminalInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalInteraction {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn prompt_label(context: &PromptContext<'_>) -> String {
        let marker = if context.descriptor.required { " *" } else { "" };
        format!(
            "[{}/{}] {}{}",
            context.index + 1,
            context.total,
            context.descriptor.label,
            marker
        )
    }

    fn prompt_choice(&self, context: &PromptContext<'_>, options: &[String]) -> PromptResponse {
        let mut items: Vec<&str> = options.iter().map(String::as_str).collect();
        items.push(BACK_LABEL);
        let default = context
            .current_text()
            .and_then(|current| options.iter().position(|option| option == current))
            .unwrap_or(0);
        let selection = Select::with_theme(&self.theme)
            .with_prompt(Self::prompt_label(context))
            .items(&items)
            .default(default)
            .interact_opt();
        match selection {
            Ok(Some(index)) if index < options.len() => {
                PromptResponse::Value(options[index].clone())
            }
            Ok(Some(_)) => PromptResponse::Back,
            _ => PromptResponse::Cancel,
        }
    }

    fn prompt_flag(&self, context: &PromptContext<'_>) -> PromptResponse {
        let current = context.current.is_some_and(|value| value.is_filled());
        match Confirm::with_theme(&self.theme)
            .with_prompt(Self::prompt_label(context))
            .default(current)
            .interact_opt()
        {
            Ok(Some(flag)) => PromptResponse::Flag(flag),
            _ => PromptResponse::Cancel,
        }
    }

    fn prompt_text(&self, context: &PromptContext<'_>) -> PromptResponse {
        if let Some(help) = context.descriptor.help {
            output::info(help);
        }
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(Self::prompt_label(context))
            .allow_empty(true);
        if let Some(current) = context.current_text() {
            input = input.with_initial_text(current);
        }
        match input.interact_text() {
            Ok(raw) if raw.trim() == BACK_COMMAND => PromptResponse::Back,
            Ok(raw) if raw.trim() == CANCEL_COMMAND => PromptResponse::Cancel,
            Ok(raw) => PromptResponse::Value(raw),
            Err(_) => PromptResponse::Cancel,
        }
    }
}

impl WizardInteraction for TerminalInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse {
        if let Some(err) = context.error {
            output::warning(format!("{}: {}", context.descriptor.label, err));
        }
        match (&context.choices, context.descriptor.kind) {
            (_, FieldKind::Flag) => self.prompt_flag(context),
            (Some(options), _) if !options.is_empty() => self.prompt_choice(context, options),
            _ => self.prompt_text(context),
        }
    }

    fn review(&mut self, _summary: &ReviewSummary, lines: &[String]) -> ReviewResponse {
        for line in lines {
            println!("{line}");
        }
        println!();

        let mut actions: Vec<(String, ReviewResponse)> =
            vec![("Submit quote request".into(), ReviewResponse::Confirm)];
        for step in [Step::Personal, Step::Vehicle, Step::Policy] {
            actions.push((format!("Edit {}", step.title()), ReviewResponse::Edit(step)));
        }
        actions.push(("Back".into(), ReviewResponse::Back));
        actions.push(("Cancel".into(), ReviewResponse::Cancel));

        let labels: Vec<&str> = actions.iter().map(|(label, _)| label.as_str()).collect();
        match Select::with_theme(&self.theme)
            .with_prompt("Review your entries")
            .items(&labels)
            .default(0)
            .interact_opt()
        {
            Ok(Some(index)) => actions
                .get(index)
                .map(|(_, response)| *response)
                .unwrap_or(ReviewResponse::Cancel),
            _ => ReviewResponse::Cancel,
        }
    }

    fn step_started(&mut self, step: Step, progress: u8) {
        output::section(format!(
            "Step {} of {} – {} ({}%)",
            step,
            Step::COUNT,
            step.title(),
            progress
        ));
        output::info(step.description());
        if step != Step::Review {
            output::info(format!(
                "Type {BACK_COMMAND} to revisit the previous field or {CANCEL_COMMAND} to stop."
            ));
        }
    }
}
