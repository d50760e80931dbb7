//! Suggested priority and escalation heuristics

use once_cell::sync::Lazy;
use regex::RegexSet;

use crate::types::{FormData, Priority};

static CRITICAL: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)\b(urgent|emergency|critical|asap)\b",
        r"(?i)\bpatients?\b",
        r"(?i)\bsafety\b",
        r"(?i)\b(ransomware|data breach)\b",
        r"(?i)\b(entire|whole) (clinic|hospital|department|floor)\b",
    ])
    .expect("valid critical patterns")
});

static HIGH: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)\b(down|outage|broken)\b",
        r"(?i)\bnot working\b",
        r"(?i)\bmultiple users\b",
        r"(?i)\b(can't|cannot|unable to) (log ?in|access|print|connect)\b",
        r"(?i)\bcrash(es|ed|ing)?\b",
    ])
    .expect("valid high patterns")
});

static LOW: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)\b(minor|cosmetic)\b",
        r"(?i)\bno rush\b",
        r"(?i)\bwhen(ever)? (you|someone) (get|gets|has|have) (a )?(chance|time)\b",
        r"(?i)\b(question|request|how do i|how to)\b",
        r"(?i)\bnice to have\b",
    ])
    .expect("valid low patterns")
});

/// Substrings that flag a ticket for escalation regardless of priority
pub const ESCALATION_KEYWORDS: &[&str] = &[
    "urgent",
    "emergency",
    "critical",
    "down",
    "outage",
    "patient",
    "immediate",
    "security",
    "breach",
    "virus",
    "malware",
    "ransomware",
    "data loss",
    "hipaa",
];

/// Guess a priority from the text. Tiers are tried critical, high, low;
/// the first tier with a match wins, otherwise medium.
pub fn suggest_priority(text: &str) -> Priority {
    if CRITICAL.is_match(text) {
        Priority::Critical
    } else if HIGH.is_match(text) {
        Priority::High
    } else if LOW.is_match(text) {
        Priority::Low
    } else {
        Priority::Medium
    }
}

/// High and critical tickets always escalate; anything else escalates when
/// the description mentions an escalation keyword.
pub fn should_escalate(form: &FormData) -> bool {
    if matches!(form.priority, Some(Priority::Critical | Priority::High)) {
        return true;
    }
    let lower = form.description.to_lowercase();
    ESCALATION_KEYWORDS.iter().any(|k| lower.contains(k))
}
