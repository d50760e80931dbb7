//! Linear step sequencer for the intake wizard

use thiserror::Error;

use super::validation::{validate, ValidationError};
use super::Step;
use crate::templates::MessageRenderer;
use crate::types::FormData;

/// Errors from moving between steps
#[derive(Debug, Error)]
pub enum StepError {
    /// The current step's fields are not valid
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Confirmation has no successor; the ticket must be submitted instead
    #[error("Already at the final step")]
    Terminal,

    /// Editing is only offered from the confirmation step
    #[error("Cannot return to the description from the {0} step")]
    EditUnavailable(Step),

    #[error("Failed to render prompt: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Result of a successful forward move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    pub step: Step,
    pub prompt: String,
}

/// Tracks the current step and produces the assistant prompt for each move.
///
/// Every forward edge is gated by validation of the step being left. The
/// only backward edge is confirmation → description.
#[derive(Debug)]
pub struct StepSequencer {
    current: Step,
    renderer: MessageRenderer,
}

impl Default for StepSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl StepSequencer {
    pub fn new() -> Self {
        Self {
            current: Step::first(),
            renderer: MessageRenderer::new(),
        }
    }

    pub fn current(&self) -> Step {
        self.current
    }

    /// Validate the current step without moving
    pub fn validate(&self, form: &FormData) -> Result<(), ValidationError> {
        validate(form, self.current)
    }

    /// Move to the next step if the current one validates.
    ///
    /// On any error the current step is left unchanged.
    pub fn advance(&mut self, form: &FormData) -> Result<Advance, StepError> {
        validate(form, self.current)?;
        let next = self.current.next().ok_or(StepError::Terminal)?;
        let prompt = self.renderer.step_prompt(next, form)?;

        tracing::debug!(from = %self.current, to = %next, "Advancing intake step");
        self.current = next;
        Ok(Advance { step: next, prompt })
    }

    /// Return from confirmation to the description step, keeping all data
    pub fn edit_description(&mut self) -> Result<Step, StepError> {
        if self.current != Step::Confirmation {
            return Err(StepError::EditUnavailable(self.current));
        }
        self.current = Step::Description;
        Ok(self.current)
    }

    /// Start over at the first step
    pub fn reset(&mut self) {
        self.current = Step::first();
    }
}
