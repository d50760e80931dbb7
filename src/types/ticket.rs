//! Outbound ticket payload sent to the workflow webhook.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clinic::ClinicId;
use super::form::{FormData, Priority};
use crate::classifier;
use crate::steps::format_phone;

/// Status every new ticket starts in
pub const INITIAL_STATUS: &str = "Open";

/// Finalized ticket, built once at submission time and never modified.
///
/// Field names follow the webhook's camelCase JSON contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub ticket_id: String,
    pub clinic_name: String,
    pub department: String,
    pub location: String,
    pub phone: String,
    pub priority: String,
    pub description: String,
    pub category: String,
    pub needs_escalation: bool,
    pub suggested_solution: String,
    pub timestamp: String,
    pub status: String,
    #[serde(default)]
    pub requester_email: String,
}

/// Build a ticket identifier: clinic code plus the last six digits of the
/// Unix millisecond timestamp (e.g. `NOR-482913`)
pub fn generate_ticket_id(clinic: Option<ClinicId>, now: DateTime<Utc>) -> String {
    let prefix = clinic.map(|c| c.code()).unwrap_or_else(|| "UNK".to_string());
    let suffix = now.timestamp_millis().rem_euclid(1_000_000);
    format!("{prefix}-{suffix:06}")
}

impl Ticket {
    /// Sanitize the form, run the classifier and assemble the payload
    pub fn assemble(form: &FormData, now: DateTime<Utc>) -> Self {
        let form = classifier::sanitize(form);
        let category = classifier::categorize(&form.description);
        let priority = form.priority.unwrap_or(Priority::Medium);

        Self {
            ticket_id: generate_ticket_id(form.clinic(), now),
            clinic_name: form.clinic_name().unwrap_or("Unknown Clinic").to_string(),
            department: form.department().unwrap_or("Unknown").to_string(),
            location: form.location(),
            phone: format_phone(&form.phone),
            priority: priority.as_upper().to_string(),
            description: classifier::reword_description(&form.description),
            category: category.to_string(),
            needs_escalation: classifier::should_escalate(&form),
            suggested_solution: classifier::suggest_solution(&form.description, category)
                .to_string(),
            timestamp: now.to_rfc3339(),
            status: INITIAL_STATUS.to_string(),
            requester_email: String::new(),
        }
    }

    /// Parsed priority, falling back to medium for unknown values
    pub fn priority_level(&self) -> Priority {
        self.priority.parse().unwrap_or(Priority::Medium)
    }
}
