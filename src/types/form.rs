//! Form data accumulated across the intake steps.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use super::clinic::ClinicId;

/// Ticket priority chosen by the requester
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn all() -> &'static [Priority] {
        &[
            Priority::Low,
            Priority::Medium,
            Priority::High,
            Priority::Critical,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Priority::Low => "Non-urgent issue that does not impact work",
            Priority::Medium => "Issue impacts work but has workarounds",
            Priority::High => "Significant impact with limited workarounds",
            Priority::Critical => "Complete work stoppage, patient care affected",
        }
    }

    /// Uppercase form used in the ticket payload
    pub fn as_upper(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
        }
    }

    /// Committed first-response window in hours
    pub fn sla_hours(&self) -> u32 {
        match self {
            Priority::Critical => 1,
            Priority::High => 4,
            Priority::Medium => 8,
            Priority::Low => 24,
        }
    }

    /// Human-readable response window ("1 hour", "4 hours", ...)
    pub fn response_time(&self) -> String {
        match self.sla_hours() {
            1 => "1 hour".to_string(),
            n => format!("{n} hours"),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            other => Err(format!("Unknown priority: {other}")),
        }
    }
}

/// Errors from updating form selections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Select a clinic before choosing a department")]
    NoClinicSelected,

    #[error("{clinic} has no department named '{department}'")]
    UnknownDepartment { clinic: String, department: String },
}

/// Fields collected by the wizard for one ticket.
///
/// `clinic` and `department` are only changed through [`FormData::select_clinic`]
/// and [`FormData::select_department`] so a department never outlives the
/// clinic it was chosen for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    #[serde(default)]
    clinic: Option<ClinicId>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    pub floor: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub description: String,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clinic(&self) -> Option<ClinicId> {
        self.clinic
    }

    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    /// Select a clinic; the department is always cleared
    pub fn select_clinic(&mut self, clinic: ClinicId) {
        self.clinic = Some(clinic);
        self.department = None;
    }

    /// Select a department from the current clinic's list
    pub fn select_department(&mut self, department: &str) -> Result<(), FormError> {
        let clinic = self.clinic.ok_or(FormError::NoClinicSelected)?.clinic();
        if !clinic.has_department(department) {
            return Err(FormError::UnknownDepartment {
                clinic: clinic.name.to_string(),
                department: department.to_string(),
            });
        }
        self.department = Some(department.to_string());
        Ok(())
    }

    /// Display name of the selected clinic, if any
    pub fn clinic_name(&self) -> Option<&'static str> {
        self.clinic.map(|c| c.display_name())
    }

    /// "Floor {floor}, Room {room}"
    pub fn location(&self) -> String {
        format!("Floor {}, Room {}", self.floor, self.room)
    }

    /// Confirm a deserialized department belongs to its clinic
    pub fn check_selection(&self) -> Result<(), FormError> {
        match (self.clinic, self.department.as_deref()) {
            (None, Some(_)) => Err(FormError::NoClinicSelected),
            (Some(id), Some(dept)) if !id.clinic().has_department(dept) => {
                Err(FormError::UnknownDepartment {
                    clinic: id.clinic().name.to_string(),
                    department: dept.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Load a saved form from a `.json` or `.toml` file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read form file {}", path.display()))?;
        let form: FormData = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON form in {}", path.display()))?,
            _ => toml::from_str(&content)
                .with_context(|| format!("Invalid TOML form in {}", path.display()))?,
        };
        form.check_selection()?;
        Ok(form)
    }

    /// Copy with every string field trimmed
    pub fn trimmed(&self) -> Self {
        Self {
            clinic: self.clinic,
            department: self.department.as_ref().map(|d| d.trim().to_string()),
            floor: self.floor.trim().to_string(),
            room: self.room.trim().to_string(),
            phone: self.phone.trim().to_string(),
            priority: self.priority,
            description: self.description.trim().to_string(),
        }
    }
}
