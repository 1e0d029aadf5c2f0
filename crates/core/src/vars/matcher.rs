//! Placeholder tag recognition.
//!
//! A tag is `{{`, optional whitespace, `v` or `V`, one or more ASCII digits,
//! optional whitespace, `}}`. Anything else between double braces is not a
//! tag and is ignored.

use regex::Regex;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([vV][0-9]+)\s*\}\}").unwrap());

/// One tag occurrence found in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    /// Letter and digits exactly as written, e.g. `V12`.
    pub original_tag: String,
    /// The digit run without the leading letter, e.g. `12`.
    pub digits: String,
}

impl TagMatch {
    /// Canonical registry id: lowercase `v` followed by the digits.
    #[must_use]
    pub fn id(&self) -> String {
        format!("v{}", self.digits)
    }
}

/// Find every non-overlapping tag in `text`, left to right.
pub fn find_tags(text: &str) -> Vec<TagMatch> {
    TAG_RE
        .captures_iter(text)
        .map(|caps| {
            let original_tag = caps[1].to_string();
            let digits = original_tag[1..].to_string();
            TagMatch { original_tag, digits }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(text: &str) -> Vec<String> {
        find_tags(text).iter().map(TagMatch::id).collect()
    }

    #[test]
    fn matches_plain_and_spaced_tags() {
        assert_eq!(ids("{{v1}} and {{ v2 }} and {{\tv3\t}}"), vec!["v1", "v2", "v3"]);
    }

    #[test]
    fn leading_letter_is_case_insensitive() {
        let tags = find_tags("Total: {{ V12 }}");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].original_tag, "V12");
        assert_eq!(tags[0].digits, "12");
        assert_eq!(tags[0].id(), "v12");
    }

    #[test]
    fn digits_are_kept_literally() {
        assert_eq!(ids("{{ v007 }}"), vec!["v007"]);
    }

    #[test]
    fn ignores_other_double_brace_content() {
        assert!(find_tags("{{ name }} {{ v }} {{ vx1 }} {{ q1 }} {{ v1a }}").is_empty());
        assert!(find_tags("{ v1 } {{ v1 }").is_empty());
    }

    #[test]
    fn no_match_is_empty_not_an_error() {
        assert!(find_tags("").is_empty());
        assert!(find_tags("plain text").is_empty());
    }

    #[test]
    fn repeated_tags_are_all_reported() {
        assert_eq!(ids("{{v1}}{{v1}}{{V1}}"), vec!["v1", "v1", "v1"]);
    }
}
