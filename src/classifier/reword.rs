//! Plain-language to technical rewording

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// Prefix on every reworded description
pub const REPORT_PREFIX: &str = "Technical Issue Report: ";

const DICTIONARY: &[(&str, &str)] = &[
    ("not working", "non-functional"),
    ("broken", "malfunctioning"),
    ("frozen", "unresponsive"),
    ("slow", "performance degradation"),
    ("crashed", "application failure"),
    ("error", "exception"),
    ("blue screen", "BSOD (Blue Screen of Death)"),
    ("wifi", "wireless network"),
    ("internet", "network connectivity"),
    ("printing", "print service"),
    ("won't start", "boot failure"),
    ("black screen", "display failure"),
];

static RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    DICTIONARY
        .iter()
        .map(|(term, replacement)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(term));
            (
                Regex::new(&pattern).expect("valid reword pattern"),
                *replacement,
            )
        })
        .collect()
});

/// Replace everyday phrasing with technical terms and prefix the result
pub fn reword_description(text: &str) -> String {
    let mut out = text.to_string();
    for (re, replacement) in RULES.iter() {
        if re.is_match(&out) {
            out = re.replace_all(&out, NoExpand(replacement)).into_owned();
        }
    }
    format!("{REPORT_PREFIX}{out}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_substitution() {
        assert_eq!(
            reword_description("The printer is broken"),
            "Technical Issue Report: The printer is malfunctioning"
        );
    }

    #[test]
    fn test_case_insensitive_and_multi_word() {
        assert_eq!(
            reword_description("PC shows a Blue Screen and WON'T START"),
            "Technical Issue Report: PC shows a BSOD (Blue Screen of Death) and boot failure"
        );
    }

    #[test]
    fn test_whole_words_only() {
        // "slowly" and "errors" are not dictionary words
        assert_eq!(
            reword_description("It loads slowly with errors"),
            "Technical Issue Report: It loads slowly with errors"
        );
    }

    #[test]
    fn test_no_replacement_introduces_another_term() {
        for (i, (_, replacement)) in DICTIONARY.iter().enumerate() {
            for (j, (re, _)) in RULES.iter().enumerate() {
                if i != j {
                    assert!(
                        !re.is_match(replacement),
                        "{replacement} would be reworded again"
                    );
                }
            }
        }
    }

    #[test]
    fn test_empty_text_still_prefixed() {
        assert_eq!(reword_description(""), REPORT_PREFIX);
    }
}
