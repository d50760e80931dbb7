//! Embedded assistant message templates.
//!
//! Short prompts live here as constants; the multi-line summary and result
//! messages are `.hbs` files under `messages/` rendered with handlebars.

use handlebars::{no_escape, Handlebars, RenderError};
use serde::Serialize;
use serde_json::json;

use crate::classifier;
use crate::steps::{format_phone, Step};
use crate::types::{FormData, Ticket};

pub const WELCOME: &str = "Welcome to Medical IT Support! I'll guide you through reporting your technical issue. Let's start by selecting your clinic.";

pub const PROCESSING: &str = "Processing your IT support ticket...";

const DEPARTMENT_PROMPT: &str =
    "Great! You've selected {{clinic_name}}. Now, please select your department.";
const LOCATION_PROMPT: &str =
    "Thanks! Now I need to know your location. Please enter the floor and room number.";
const CONTACT_PROMPT: &str =
    "Please provide your contact phone number so the IT team can reach you if needed.";
const PRIORITY_PROMPT: &str = "How would you categorize the priority of this issue?";
const DESCRIPTION_PROMPT: &str =
    "Please describe the technical issue you're experiencing. Provide as much detail as possible.";
const RETRYING: &str =
    "Having trouble connecting to the IT system. Retrying... (Attempt {{attempt}}/{{max}})";

const CONFIRMATION: &str = include_str!("messages/confirmation.hbs");
const SUBMITTED: &str = include_str!("messages/submitted.hbs");
const SERVICE_FAILURE: &str = include_str!("messages/service_failure.hbs");
const EXCEPTION_FAILURE: &str = include_str!("messages/exception_failure.hbs");

/// Marker text present in every retry notice
pub const RETRY_MARKER: &str = "Retrying...";

/// Renders assistant messages from the embedded templates
pub struct MessageRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for MessageRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MessageRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageRenderer").finish_non_exhaustive()
    }
}

impl MessageRenderer {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        // Messages are plain text, not HTML
        handlebars.register_escape_fn(no_escape);
        handlebars.set_strict_mode(false);
        Self { handlebars }
    }

    fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String, RenderError> {
        self.handlebars
            .render_template(template, data)
            .map(|s| s.trim_end().to_string())
    }

    /// Prompt shown on entering `step`
    pub fn step_prompt(&self, step: Step, form: &FormData) -> Result<String, RenderError> {
        match step {
            Step::Clinic => Ok(WELCOME.to_string()),
            Step::Department => self.render(
                DEPARTMENT_PROMPT,
                &json!({ "clinic_name": form.clinic_name().unwrap_or("your clinic") }),
            ),
            Step::Location => Ok(LOCATION_PROMPT.to_string()),
            Step::Contact => Ok(CONTACT_PROMPT.to_string()),
            Step::Priority => Ok(PRIORITY_PROMPT.to_string()),
            Step::Description => Ok(DESCRIPTION_PROMPT.to_string()),
            Step::Confirmation => self.confirmation_summary(form),
        }
    }

    /// Summary of everything collected, with the derived category and
    /// reworded description
    pub fn confirmation_summary(&self, form: &FormData) -> Result<String, RenderError> {
        let form = &classifier::sanitize(form);
        let category = classifier::categorize(&form.description);
        let data = json!({
            "clinic_name": form.clinic_name().unwrap_or("Unknown Clinic"),
            "department": form.department().unwrap_or("Unknown"),
            "location": form.location(),
            "phone": format_phone(&form.phone),
            "priority": form.priority.map(|p| p.as_upper()).unwrap_or("MEDIUM"),
            "category": category.to_string(),
            "description": classifier::reword_description(&form.description),
            "needs_escalation": classifier::should_escalate(form),
        });
        self.render(CONFIRMATION, &data)
    }

    pub fn retrying(&self, attempt: usize, max: usize) -> Result<String, RenderError> {
        self.render(RETRYING, &json!({ "attempt": attempt, "max": max }))
    }

    pub fn submitted(&self, ticket: &Ticket) -> Result<String, RenderError> {
        let data = json!({
            "ticket_id": ticket.ticket_id,
            "clinic_name": ticket.clinic_name,
            "category": ticket.category,
            "priority": ticket.priority,
            "response_time": ticket.priority_level().response_time(),
            "suggested_solution": ticket.suggested_solution,
        });
        self.render(SUBMITTED, &data)
    }

    /// Terminal failure after the service itself reported an error
    pub fn service_failure(
        &self,
        message: &str,
        support_contact: &str,
    ) -> Result<String, RenderError> {
        self.render(
            SERVICE_FAILURE,
            &json!({ "message": message, "support_contact": support_contact }),
        )
    }

    /// Terminal failure after a transport error or unusable response
    pub fn exception_failure(
        &self,
        message: &str,
        support_contact: &str,
    ) -> Result<String, RenderError> {
        self.render(
            EXCEPTION_FAILURE,
            &json!({ "message": message, "support_contact": support_contact }),
        )
    }
}
