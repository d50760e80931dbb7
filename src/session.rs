//! One intake conversation: form data, transcript, current step and the
//! submission guard, owned together and driven by `&mut` calls.

use thiserror::Error;

use crate::steps::{Step, StepError, StepSequencer, ValidationError};
use crate::submission::{SubmissionOutcome, Submitter};
use crate::templates::WELCOME;
use crate::types::{ClinicId, FormData, FormError, Message, MessageRole, Priority, Transcript};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("A ticket submission is already in progress")]
    AlreadyProcessing,

    #[error("Tickets can only be submitted from the confirmation step (currently at {0})")]
    NotConfirmed(Step),

    #[error(transparent)]
    Step(#[from] StepError),

    #[error(transparent)]
    Form(#[from] FormError),
}

impl SessionError {
    /// The validation failure behind this error, if any
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            SessionError::Step(StepError::Invalid(v)) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct IntakeSession {
    form: FormData,
    sequencer: StepSequencer,
    transcript: Transcript,
    processing: bool,
    outcome: Option<SubmissionOutcome>,
}

impl Default for IntakeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeSession {
    /// Fresh session at the clinic step with the welcome message
    pub fn new() -> Self {
        let mut transcript = Transcript::new();
        transcript.assistant(WELCOME, Step::first());
        Self {
            form: FormData::new(),
            sequencer: StepSequencer::new(),
            transcript,
            processing: false,
            outcome: None,
        }
    }

    /// Session pre-filled from a saved form, still at the first step
    pub fn with_form(form: FormData) -> Self {
        Self {
            form,
            ..Self::new()
        }
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn current_step(&self) -> Step {
        self.sequencer.current()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Result of the last submission, if one finished
    pub fn outcome(&self) -> Option<&SubmissionOutcome> {
        self.outcome.as_ref()
    }

    /// Messages belonging to the current step
    pub fn visible_messages(&self) -> Vec<&Message> {
        self.transcript.for_step(self.current_step()).collect()
    }

    pub fn select_clinic(&mut self, clinic: ClinicId) {
        self.form.select_clinic(clinic);
    }

    pub fn select_department(&mut self, department: &str) -> Result<(), SessionError> {
        Ok(self.form.select_department(department)?)
    }

    pub fn set_floor(&mut self, floor: impl Into<String>) {
        self.form.floor = floor.into();
    }

    pub fn set_room(&mut self, room: impl Into<String>) {
        self.form.room = room.into();
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.form.phone = phone.into();
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.form.priority = Some(priority);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.form.description = description.into();
    }

    /// Check the current step without moving
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.sequencer.validate(&self.form)
    }

    /// Record the user's answer for the current step and move on.
    ///
    /// On a validation failure nothing is recorded and the step is
    /// unchanged.
    pub fn advance(&mut self) -> Result<Step, SessionError> {
        let leaving = self.current_step();
        let advance = self.sequencer.advance(&self.form)?;

        if let Some(answer) = self.answer_for(leaving) {
            self.transcript.push(MessageRole::User, answer, leaving);
        }
        self.transcript.assistant(advance.prompt, advance.step);
        Ok(advance.step)
    }

    /// Go back from confirmation to edit the description
    pub fn edit_description(&mut self) -> Result<Step, SessionError> {
        let step = self.sequencer.edit_description()?;
        self.transcript.push(
            MessageRole::System,
            "Editing the issue description",
            step,
        );
        Ok(step)
    }

    /// Start a brand new ticket
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Claim the submission slot. Fails while another submission runs or
    /// before the confirmation step.
    pub fn begin_submission(&mut self) -> Result<FormData, SessionError> {
        if self.processing {
            return Err(SessionError::AlreadyProcessing);
        }
        let step = self.current_step();
        if step != Step::Confirmation {
            return Err(SessionError::NotConfirmed(step));
        }
        self.processing = true;
        Ok(self.form.clone())
    }

    /// Append a progress message produced during submission
    pub fn record_progress(&mut self, content: impl Into<String>) {
        self.transcript.assistant(content, Step::Confirmation);
    }

    /// Release the submission slot and keep the outcome
    pub fn finish_submission(&mut self, outcome: SubmissionOutcome) {
        self.processing = false;
        self.outcome = Some(outcome);
    }

    /// Submit the ticket and wait for the final outcome
    pub async fn submit(
        &mut self,
        submitter: &Submitter,
    ) -> Result<&SubmissionOutcome, SessionError> {
        let form = self.begin_submission()?;
        let transcript = &mut self.transcript;
        let outcome = submitter
            .submit_with(&form, |text| {
                transcript.assistant(text, Step::Confirmation);
            })
            .await;
        self.processing = false;
        Ok(self.outcome.insert(outcome))
    }

    fn answer_for(&self, step: Step) -> Option<String> {
        let form = &self.form;
        match step {
            Step::Clinic => form.clinic_name().map(str::to_string),
            Step::Department => form.department().map(str::to_string),
            Step::Location => Some(form.location()),
            Step::Contact => Some(form.phone.trim().to_string()),
            Step::Priority => form.priority.map(|p| p.label().to_string()),
            Step::Description => Some(form.description.trim().to_string()),
            Step::Confirmation => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::RetryPolicy;
    use crate::webhook::{DeliveryError, MockWebhookSender};
    use std::sync::Arc;

    fn walk_to_confirmation(session: &mut IntakeSession) {
        session.select_clinic(ClinicId::Eastside);
        session.advance().unwrap();
        session.select_department("Mental Health").unwrap();
        session.advance().unwrap();
        session.set_floor("1");
        session.set_room("104");
        session.advance().unwrap();
        session.set_phone("555-010-2030");
        session.advance().unwrap();
        session.set_priority(Priority::Low);
        session.advance().unwrap();
        session.set_description("The second monitor keeps flickering on and off");
        session.advance().unwrap();
    }

    #[test]
    fn test_new_session_welcomes() {
        let session = IntakeSession::new();
        assert_eq!(session.current_step(), Step::Clinic);
        let visible = session.visible_messages();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].content, WELCOME);
    }

    #[test]
    fn test_advance_records_answer_and_prompt() {
        let mut session = IntakeSession::new();
        session.select_clinic(ClinicId::Northside);
        assert_eq!(session.advance().unwrap(), Step::Department);

        let messages = session.transcript().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[1].content, "Northside Medical Center");
        assert_eq!(messages[1].step, Step::Clinic);
        assert_eq!(messages[2].step, Step::Department);

        let visible = session.visible_messages();
        assert_eq!(visible.len(), 1);
        assert!(visible[0].content.contains("Northside Medical Center"));
    }

    #[test]
    fn test_invalid_advance_records_nothing() {
        let mut session = IntakeSession::new();
        let err = session.advance().unwrap_err();
        assert_eq!(err.validation(), Some(ValidationError::ClinicRequired));
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.current_step(), Step::Clinic);
    }

    #[test]
    fn test_department_from_other_clinic_rejected() {
        let mut session = IntakeSession::new();
        session.select_clinic(ClinicId::Westview);
        assert!(matches!(
            session.select_department("ICU"),
            Err(SessionError::Form(_))
        ));
        assert_eq!(session.form().department(), None);
    }

    #[test]
    fn test_submit_requires_confirmation() {
        let mut session = IntakeSession::new();
        assert!(matches!(
            session.begin_submission(),
            Err(SessionError::NotConfirmed(Step::Clinic))
        ));
    }

    #[test]
    fn test_second_submission_rejected_while_processing() {
        let mut session = IntakeSession::new();
        walk_to_confirmation(&mut session);

        session.begin_submission().unwrap();
        assert!(session.is_processing());
        assert!(matches!(
            session.begin_submission(),
            Err(SessionError::AlreadyProcessing)
        ));
    }

    #[test]
    fn test_edit_description_round_trip() {
        let mut session = IntakeSession::new();
        walk_to_confirmation(&mut session);

        assert_eq!(session.edit_description().unwrap(), Step::Description);
        session.set_description("Both monitors flicker when the scanner runs");
        assert_eq!(session.advance().unwrap(), Step::Confirmation);
        assert_eq!(session.form().department(), Some("Mental Health"));
    }

    #[tokio::test]
    async fn test_submit_success() {
        let mock = MockWebhookSender::new();
        let submitter = Submitter::new(
            Arc::new(mock.clone()),
            RetryPolicy::immediate(2),
            "help@example.org",
        );
        let mut session = IntakeSession::new();
        walk_to_confirmation(&mut session);

        let outcome = session.submit(&submitter).await.unwrap();
        assert!(outcome.is_success());
        assert!(outcome.ticket().ticket_id.starts_with("EAS-"));
        assert!(!session.is_processing());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_submission_can_be_retried() {
        let mock = MockWebhookSender::failing_times(DeliveryError::Transport("refused".into()), 1);
        let submitter = Submitter::new(
            Arc::new(mock.clone()),
            RetryPolicy::immediate(0),
            "help@example.org",
        );
        let mut session = IntakeSession::new();
        walk_to_confirmation(&mut session);

        assert!(!session.submit(&submitter).await.unwrap().is_success());
        assert!(!session.is_processing());
        assert!(session.submit(&submitter).await.unwrap().is_success());
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn test_reset_starts_over() {
        let mut session = IntakeSession::new();
        walk_to_confirmation(&mut session);
        session.reset();
        assert_eq!(session.current_step(), Step::Clinic);
        assert_eq!(session.form(), &FormData::new());
        assert_eq!(session.transcript().len(), 1);
    }
}
