//! Review-screen summary built from the field store.

use crate::currency::{format_currency_digits, symbol_for, CurrencyCode, LocaleConfig};
use crate::fields::{
    fields_for_step, in_active_branch, FieldDescriptor, FieldStore, FieldValue, SummaryFormat,
};
use crate::steps::Step;
use crate::validation::leading_integer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// One titled block of the review screen. `step` is the target of the
/// block's "Edit" link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySection {
    pub title: &'static str,
    pub step: Step,
    pub entries: Vec<SummaryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    pub sections: Vec<SummarySection>,
}

impl ReviewSummary {
    /// Sections with at least one entry; empty blocks are not displayed.
    pub fn non_empty_sections(&self) -> impl Iterator<Item = &SummarySection> {
        self.sections
            .iter()
            .filter(|section| !section.entries.is_empty())
    }

    pub fn section(&self, step: Step) -> Option<&SummarySection> {
        self.sections.iter().find(|section| section.step == step)
    }

    pub fn entry(&self, key: &str) -> Option<&SummaryEntry> {
        self.sections
            .iter()
            .flat_map(|section| section.entries.iter())
            .find(|entry| entry.key == key)
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for section in self.non_empty_sections() {
            lines.push(format!("{} (step {})", section.title, section.step));
            for entry in &section.entries {
                lines.push(format!("  {}: {}", entry.label, entry.value));
            }
        }
        lines
    }
}

const SECTIONS: [(&str, Step); 3] = [
    ("Personal Details", Step::Personal),
    ("Vehicle Details", Step::Vehicle),
    ("Policy Details", Step::Policy),
];

pub fn render_summary(store: &FieldStore) -> ReviewSummary {
    render_summary_with(store, &CurrencyCode::default(), &LocaleConfig::default())
}

/// Builds the three review sections. A field appears only when its value is
/// present, non-empty, and not `false`, and only while its branch is active:
/// previous-policy details need a "Yes" answer.
pub fn render_summary_with(
    store: &FieldStore,
    currency: &CurrencyCode,
    locale: &LocaleConfig,
) -> ReviewSummary {
    let sections = SECTIONS
        .iter()
        .map(|&(title, step)| SummarySection {
            title,
            step,
            entries: fields_for_step(step)
                .filter(|field| in_active_branch(field.key, store))
                .filter_map(|field| {
                    let value = store.get(field.key).filter(|value| value.is_filled())?;
                    Some(SummaryEntry {
                        key: field.key,
                        label: field.label,
                        value: format_value(field, value, currency, locale),
                    })
                })
                .collect(),
        })
        .collect();
    ReviewSummary { sections }
}

fn format_value(
    field: &FieldDescriptor,
    value: &FieldValue,
    currency: &CurrencyCode,
    locale: &LocaleConfig,
) -> String {
    match (field.format, value) {
        (SummaryFormat::Boolean, value) => yes_no(value.is_filled()).to_string(),
        (_, FieldValue::Flag(flag)) => yes_no(*flag).to_string(),
        (SummaryFormat::Currency, FieldValue::Text(text)) => match leading_integer(text) {
            Some((negative, digits)) => format_currency_digits(negative, digits, currency, locale),
            None => format!("{}{}", symbol_for(currency.as_str()), text),
        },
        (SummaryFormat::Plain, FieldValue::Text(text)) => text.clone(),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
