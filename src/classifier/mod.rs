//! Keyword heuristics that turn a raw intake form into ticket metadata.
//!
//! Everything here is a pure function of its input.

mod category;
mod priority;
mod reword;
mod solution;

pub use category::{categorize, Category};
pub use priority::{should_escalate, suggest_priority, ESCALATION_KEYWORDS};
pub use reword::{reword_description, REPORT_PREFIX};
pub use solution::suggest_solution;

use crate::types::FormData;

/// Copy of `form` with every text field trimmed
pub fn sanitize(form: &FormData) -> FormData {
    form.trimmed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClinicId;

    #[test]
    fn test_sanitize_trims_and_is_idempotent() {
        let mut form = FormData::new();
        form.select_clinic(ClinicId::Northside);
        form.select_department("Radiology").unwrap();
        form.floor = " 2 ".into();
        form.room = "\t201\n".into();
        form.phone = " 555-123-4567".into();
        form.description = "  Scanner offline  ".into();

        let once = sanitize(&form);
        assert_eq!(once.floor, "2");
        assert_eq!(once.room, "201");
        assert_eq!(once.phone, "555-123-4567");
        assert_eq!(once.description, "Scanner offline");
        assert_eq!(once.department(), Some("Radiology"));
        assert_eq!(sanitize(&once), once);
    }
}
