//! Keyword-count categorization

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Support category derived from the issue description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Hardware,
    Software,
    Network,
    Access,
    Email,
    #[serde(rename = "Clinical Software")]
    ClinicalSoftware,
    Security,
    #[serde(rename = "General IT Support")]
    General,
}

/// Scored categories in tie-break order, with their keywords
const KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Hardware,
        &[
            "computer", "monitor", "printer", "keyboard", "mouse", "device", "scanner", "laptop",
            "screen", "hardware",
        ],
    ),
    (
        Category::Software,
        &[
            "program",
            "application",
            "windows",
            "software",
            "install",
            "update",
            "license",
        ],
    ),
    (
        Category::Network,
        &[
            "internet",
            "wifi",
            "wi-fi",
            "wireless",
            "connection",
            "network",
            "ethernet",
            "vpn",
            "disconnect",
        ],
    ),
    (
        Category::Access,
        &[
            "login",
            "log in",
            "password",
            "account",
            "permission",
            "access",
            "locked out",
            "username",
        ],
    ),
    (
        Category::Email,
        &["email", "outlook", "mail", "message", "inbox", "attachment"],
    ),
    (
        Category::ClinicalSoftware,
        &[
            "ehr",
            "emr",
            "epic",
            "cerner",
            "pacs",
            "patient portal",
            "charting",
            "e-prescrib",
            "lab results",
            "medical record",
        ],
    ),
    (
        Category::Security,
        &[
            "virus",
            "malware",
            "phishing",
            "ransomware",
            "breach",
            "hack",
            "suspicious",
            "hipaa",
            "spam",
        ],
    ),
];

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hardware => "Hardware",
            Category::Software => "Software",
            Category::Network => "Network",
            Category::Access => "Access",
            Category::Email => "Email",
            Category::ClinicalSoftware => "Clinical Software",
            Category::Security => "Security",
            Category::General => "General IT Support",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KEYWORDS
            .iter()
            .map(|(c, _)| *c)
            .chain(std::iter::once(Category::General))
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown category: {s}"))
    }
}

/// Number of `category` keywords found in the lowercased text
fn score(keywords: &[&str], lower: &str) -> usize {
    keywords.iter().filter(|k| lower.contains(*k)).count()
}

/// Pick the category whose keywords occur most often. Ties go to the
/// earlier category; no hits at all yields [`Category::General`].
pub fn categorize(text: &str) -> Category {
    let lower = text.to_lowercase();
    let mut best = (Category::General, 0);
    for (category, keywords) in KEYWORDS {
        let hits = score(keywords, &lower);
        if hits > best.1 {
            best = (*category, hits);
        }
    }
    best.0
}
