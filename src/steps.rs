use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four sequential sections of the quote form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Step {
    Personal = 1,
    Vehicle = 2,
    Policy = 3,
    Review = 4,
}

impl Step {
    pub const FIRST: Step = Step::Personal;
    pub const LAST: Step = Step::Review;
    pub const COUNT: u8 = 4;

    pub const ALL: [Step; 4] = [Step::Personal, Step::Vehicle, Step::Policy, Step::Review];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Step> {
        match number {
            1 => Some(Step::Personal),
            2 => Some(Step::Vehicle),
            3 => Some(Step::Policy),
            4 => Some(Step::Review),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Step> {
        Step::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Step> {
        Step::from_number(self.number().saturating_sub(1))
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Personal => "Personal Information",
            Step::Vehicle => "Vehicle Information",
            Step::Policy => "Policy Information",
            Step::Review => "Review & Submit",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Step::Personal => "Basic contact details",
            Step::Vehicle => "Details about your vehicle",
            Step::Policy => "Insurance policy details",
            Step::Review => "Review and submit your quotation request",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Visual state of a step in the progress bar relative to the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepIndicator {
    Completed,
    Active,
    Pending,
}

impl StepIndicator {
    pub fn for_step(step: Step, current: Step) -> Self {
        match step.cmp(&current) {
            std::cmp::Ordering::Less => StepIndicator::Completed,
            std::cmp::Ordering::Equal => StepIndicator::Active,
            std::cmp::Ordering::Greater => StepIndicator::Pending,
        }
    }
}
