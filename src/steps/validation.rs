//! Per-step field validation.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::Step;
use crate::types::FormData;

/// Minimum trimmed length of an issue description
pub const MIN_DESCRIPTION_LEN: usize = 10;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(?([0-9]{3})\)?[-. ]?([0-9]{3})[-. ]?([0-9]{4})$").expect("valid phone regex")
});

/// Why a step's fields were rejected. The display text is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a clinic")]
    ClinicRequired,
    #[error("Please select a department")]
    DepartmentRequired,
    #[error("Floor is required")]
    FloorRequired,
    #[error("Room number is required")]
    RoomRequired,
    #[error("Phone number is required")]
    PhoneRequired,
    #[error("Please enter a valid phone number")]
    PhoneInvalid,
    #[error("Please select a priority level")]
    PriorityRequired,
    #[error("Please describe the issue")]
    DescriptionRequired,
    #[error("Please provide more details about the issue")]
    DescriptionTooShort,
}

impl ValidationError {
    /// Name of the form field the message belongs to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::ClinicRequired => "clinic",
            ValidationError::DepartmentRequired => "department",
            ValidationError::FloorRequired => "floor",
            ValidationError::RoomRequired => "room",
            ValidationError::PhoneRequired | ValidationError::PhoneInvalid => "phone",
            ValidationError::PriorityRequired => "priority",
            ValidationError::DescriptionRequired | ValidationError::DescriptionTooShort => {
                "description"
            }
        }
    }
}

pub type ValidationResult = Result<(), ValidationError>;

/// Check the fields that belong to `step`. The first failing check wins.
pub fn validate(form: &FormData, step: Step) -> ValidationResult {
    match step {
        Step::Clinic => form
            .clinic()
            .map(|_| ())
            .ok_or(ValidationError::ClinicRequired),
        Step::Department => form
            .department()
            .map(|_| ())
            .ok_or(ValidationError::DepartmentRequired),
        Step::Location => {
            validate_floor(&form.floor)?;
            validate_room(&form.room)
        }
        Step::Contact => validate_phone(&form.phone),
        Step::Priority => form
            .priority
            .map(|_| ())
            .ok_or(ValidationError::PriorityRequired),
        Step::Description => validate_description(&form.description),
        Step::Confirmation => Ok(()),
    }
}

pub fn validate_floor(floor: &str) -> ValidationResult {
    if floor.trim().is_empty() {
        return Err(ValidationError::FloorRequired);
    }
    Ok(())
}

pub fn validate_room(room: &str) -> ValidationResult {
    if room.trim().is_empty() {
        return Err(ValidationError::RoomRequired);
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> ValidationResult {
    if phone.trim().is_empty() {
        return Err(ValidationError::PhoneRequired);
    }
    if !PHONE_RE.is_match(phone) {
        return Err(ValidationError::PhoneInvalid);
    }
    Ok(())
}

pub fn validate_description(description: &str) -> ValidationResult {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::DescriptionRequired);
    }
    if trimmed.chars().count() < MIN_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooShort);
    }
    Ok(())
}

/// Normalize a ten-digit number to `(###) ###-####`; anything else is
/// returned unchanged
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 {
        format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
    } else {
        phone.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClinicId, Priority};

    #[test]
    fn test_clinic_required() {
        let mut form = FormData::new();
        assert_eq!(
            validate(&form, Step::Clinic),
            Err(ValidationError::ClinicRequired)
        );
        assert_eq!(
            ValidationError::ClinicRequired.to_string(),
            "Please select a clinic"
        );

        form.select_clinic(ClinicId::Northside);
        assert_eq!(validate(&form, Step::Clinic), Ok(()));
    }

    #[test]
    fn test_department_required() {
        let mut form = FormData::new();
        form.select_clinic(ClinicId::Eastside);
        assert_eq!(
            validate(&form, Step::Department),
            Err(ValidationError::DepartmentRequired)
        );
        form.select_department("Nutrition").unwrap();
        assert_eq!(validate(&form, Step::Department), Ok(()));
    }

    #[test]
    fn test_floor_checked_before_room() {
        let mut form = FormData::new();
        form.room = "302B".into();
        assert_eq!(
            validate(&form, Step::Location),
            Err(ValidationError::FloorRequired)
        );
        assert_eq!(
            ValidationError::FloorRequired.to_string(),
            "Floor is required"
        );

        form.room.clear();
        assert_eq!(
            validate(&form, Step::Location),
            Err(ValidationError::FloorRequired)
        );

        form.floor = "3".into();
        assert_eq!(
            validate(&form, Step::Location),
            Err(ValidationError::RoomRequired)
        );

        form.room = "302B".into();
        assert_eq!(validate(&form, Step::Location), Ok(()));
    }

    #[test]
    fn test_whitespace_floor_is_empty() {
        let mut form = FormData::new();
        form.floor = "   ".into();
        form.room = "1".into();
        assert_eq!(
            validate(&form, Step::Location),
            Err(ValidationError::FloorRequired)
        );
    }

    #[test]
    fn test_phone_formats() {
        for ok in [
            "5551234567",
            "(555) 123-4567",
            "555-123-4567",
            "555.123.4567",
            "(555)123-4567",
        ] {
            assert_eq!(validate_phone(ok), Ok(()), "{ok} should be valid");
        }
        assert_eq!(validate_phone("notaphone"), Err(ValidationError::PhoneInvalid));
        assert_eq!(validate_phone("555-1234"), Err(ValidationError::PhoneInvalid));
        assert_eq!(validate_phone("  "), Err(ValidationError::PhoneRequired));
    }

    #[test]
    fn test_contact_step_uses_phone() {
        let mut form = FormData::new();
        form.phone = "(555) 123-4567".into();
        assert_eq!(validate(&form, Step::Contact), Ok(()));
        form.phone = "notaphone".into();
        assert_eq!(
            validate(&form, Step::Contact),
            Err(ValidationError::PhoneInvalid)
        );
    }

    #[test]
    fn test_priority_required() {
        let mut form = FormData::new();
        assert_eq!(
            validate(&form, Step::Priority),
            Err(ValidationError::PriorityRequired)
        );
        form.priority = Some(Priority::Medium);
        assert_eq!(validate(&form, Step::Priority), Ok(()));
    }

    #[test]
    fn test_description_length() {
        let mut form = FormData::new();
        assert_eq!(
            validate(&form, Step::Description),
            Err(ValidationError::DescriptionRequired)
        );

        form.description = "short".into();
        assert_eq!(
            validate(&form, Step::Description),
            Err(ValidationError::DescriptionTooShort)
        );

        form.description = "   123456789   ".into();
        assert_eq!(
            validate(&form, Step::Description),
            Err(ValidationError::DescriptionTooShort)
        );

        form.description = "This printer is not working at all".into();
        assert_eq!(validate(&form, Step::Description), Ok(()));
    }

    #[test]
    fn test_confirmation_always_valid() {
        assert_eq!(validate(&FormData::new(), Step::Confirmation), Ok(()));
    }

    #[test]
    fn test_error_fields() {
        assert_eq!(ValidationError::RoomRequired.field(), "room");
        assert_eq!(ValidationError::PhoneInvalid.field(), "phone");
        assert_eq!(ValidationError::DescriptionTooShort.field(), "description");
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("5551234567"), "(555) 123-4567");
        assert_eq!(format_phone("555.123.4567"), "(555) 123-4567");
        assert_eq!(format_phone("12345"), "12345");
    }
}
