//! Clinic catalog.
//!
//! The four clinics served by the intake wizard are fixed configuration:
//! each has a display name, a theme color and an ordered department list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a clinic in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClinicId {
    Northside,
    Westview,
    Central,
    Eastside,
}

/// Theme color used to tint the form for a clinic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClinicColor {
    Blue,
    Green,
    Purple,
    Pink,
}

/// A clinic and the departments that can raise tickets from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clinic {
    pub id: ClinicId,
    pub name: &'static str,
    pub color: ClinicColor,
    pub departments: &'static [&'static str],
}

static CLINICS: [Clinic; 4] = [
    Clinic {
        id: ClinicId::Northside,
        name: "Northside Medical Center",
        color: ClinicColor::Blue,
        departments: &[
            "Administration",
            "Radiology",
            "Emergency",
            "Laboratory",
            "Cardiology",
        ],
    },
    Clinic {
        id: ClinicId::Westview,
        name: "Westview Health Clinic",
        color: ClinicColor::Green,
        departments: &[
            "General Practice",
            "Pediatrics",
            "Physical Therapy",
            "Pharmacy",
        ],
    },
    Clinic {
        id: ClinicId::Central,
        name: "Central Hospital",
        color: ClinicColor::Purple,
        departments: &["Surgery", "ICU", "Oncology", "Neurology", "Orthopedics"],
    },
    Clinic {
        id: ClinicId::Eastside,
        name: "Eastside Family Practice",
        color: ClinicColor::Pink,
        departments: &["Family Medicine", "OB/GYN", "Mental Health", "Nutrition"],
    },
];

/// All clinics, in display order
pub fn catalog() -> &'static [Clinic] {
    &CLINICS
}

impl ClinicId {
    pub fn all() -> &'static [ClinicId] {
        &[
            ClinicId::Northside,
            ClinicId::Westview,
            ClinicId::Central,
            ClinicId::Eastside,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClinicId::Northside => "northside",
            ClinicId::Westview => "westview",
            ClinicId::Central => "central",
            ClinicId::Eastside => "eastside",
        }
    }

    /// Catalog entry for this clinic
    pub fn clinic(&self) -> &'static Clinic {
        match self {
            ClinicId::Northside => &CLINICS[0],
            ClinicId::Westview => &CLINICS[1],
            ClinicId::Central => &CLINICS[2],
            ClinicId::Eastside => &CLINICS[3],
        }
    }

    /// Display name (e.g. "Central Hospital")
    pub fn display_name(&self) -> &'static str {
        self.clinic().name
    }

    /// Short uppercase code used as the ticket identifier prefix
    pub fn code(&self) -> String {
        self.as_str()[..3].to_uppercase()
    }
}

impl fmt::Display for ClinicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClinicId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "northside" => Ok(ClinicId::Northside),
            "westview" => Ok(ClinicId::Westview),
            "central" => Ok(ClinicId::Central),
            "eastside" => Ok(ClinicId::Eastside),
            other => Err(format!("Unknown clinic: {other}")),
        }
    }
}

impl Clinic {
    /// Whether `department` is offered by this clinic (exact match)
    pub fn has_department(&self, department: &str) -> bool {
        self.departments.contains(&department)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_four_clinics_in_order() {
        let ids: Vec<ClinicId> = catalog().iter().map(|c| c.id).collect();
        assert_eq!(ids, ClinicId::all());
    }

    #[test]
    fn test_clinic_lookup_matches_catalog() {
        for id in ClinicId::all() {
            assert_eq!(id.clinic().id, *id);
        }
        assert_eq!(ClinicId::Central.display_name(), "Central Hospital");
    }

    #[test]
    fn test_code_is_first_three_letters_uppercase() {
        assert_eq!(ClinicId::Northside.code(), "NOR");
        assert_eq!(ClinicId::Eastside.code(), "EAS");
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("Westview".parse::<ClinicId>(), Ok(ClinicId::Westview));
        assert!("southside".parse::<ClinicId>().is_err());
    }

    #[test]
    fn test_departments_are_clinic_specific() {
        assert!(ClinicId::Central.clinic().has_department("ICU"));
        assert!(!ClinicId::Westview.clinic().has_department("ICU"));
    }
}
