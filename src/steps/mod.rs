//! Intake step sequencing: the fixed seven-step flow, per-step validation
//! and the sequencer that moves a session between steps.

pub mod sequencer;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use sequencer::{Advance, StepError, StepSequencer};
pub use validation::{format_phone, validate, ValidationError, ValidationResult};

/// One stage of the intake flow, always visited in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Clinic,
    Department,
    Location,
    Contact,
    Priority,
    Description,
    Confirmation,
}

impl Step {
    /// Every step in visiting order
    pub const ALL: [Step; 7] = [
        Step::Clinic,
        Step::Department,
        Step::Location,
        Step::Contact,
        Step::Priority,
        Step::Description,
        Step::Confirmation,
    ];

    pub fn first() -> Self {
        Step::Clinic
    }

    /// Position in the flow, starting at 0
    pub fn index(&self) -> usize {
        match self {
            Step::Clinic => 0,
            Step::Department => 1,
            Step::Location => 2,
            Step::Contact => 3,
            Step::Priority => 4,
            Step::Description => 5,
            Step::Confirmation => 6,
        }
    }

    /// Following step, `None` at confirmation
    pub fn next(&self) -> Option<Step> {
        match self {
            Step::Clinic => Some(Step::Department),
            Step::Department => Some(Step::Location),
            Step::Location => Some(Step::Contact),
            Step::Contact => Some(Step::Priority),
            Step::Priority => Some(Step::Description),
            Step::Description => Some(Step::Confirmation),
            Step::Confirmation => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Clinic => "clinic",
            Step::Department => "department",
            Step::Location => "location",
            Step::Contact => "contact",
            Step::Priority => "priority",
            Step::Description => "description",
            Step::Confirmation => "confirmation",
        }
    }

    /// Heading shown above the step's form
    pub fn title(&self) -> &'static str {
        match self {
            Step::Clinic => "Select Your Clinic",
            Step::Department => "Select Your Department",
            Step::Location => "Enter Your Location",
            Step::Contact => "Contact Information",
            Step::Priority => "Select Issue Priority",
            Step::Description => "Describe Your Issue",
            Step::Confirmation => "Confirm Ticket Submission",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_matches_index_order() {
        for (i, step) in Step::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
        }
    }

    #[test]
    fn test_next_walks_the_chain_without_skipping() {
        let mut step = Step::first();
        let mut visited = vec![step];
        while let Some(next) = step.next() {
            assert_eq!(next.index(), step.index() + 1);
            visited.push(next);
            step = next;
        }
        assert_eq!(visited, Step::ALL.to_vec());
        assert!(step.is_terminal());
    }
}
