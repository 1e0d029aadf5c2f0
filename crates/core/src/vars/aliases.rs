//! Answer-key alias expansion.
//!
//! Answers are keyed by the canonical `v<digits>` ids the scanner produces,
//! but template authors do not always spell tags that way. Expansion adds a
//! fixed family of alternate spellings (`V7`, `ref7`, `Q7`, ...) pointing at
//! the same value so the renderer finds a match either way.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

/// Caller-supplied answers, key to plain-text value.
pub type AnswerMap = BTreeMap<String, String>;

/// Answers plus generated aliases.
pub type ExpandedAnswerMap = BTreeMap<String, String>;

/// Maps the digit suffix of a `v<digits>` key to extra key spellings.
pub trait AliasStrategy {
    fn aliases(&self, digits: &str) -> Vec<String>;
}

/// `V{N}`, `ref{N}`, `Ref{N}`, `REF{N}`, `q{N}`, `Q{N}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAliases;

impl AliasStrategy for StandardAliases {
    fn aliases(&self, digits: &str) -> Vec<String> {
        ["V", "ref", "Ref", "REF", "q", "Q"]
            .iter()
            .map(|prefix| format!("{prefix}{digits}"))
            .collect()
    }
}

impl<F> AliasStrategy for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn aliases(&self, digits: &str) -> Vec<String> {
        self(digits)
    }
}

/// What to do when a generated alias collides with a key the caller set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasPolicy {
    /// Explicit caller keys are never replaced.
    #[default]
    PreserveExplicit,
    /// Generated aliases replace explicit keys.
    Overwrite,
}

/// Digit suffix of a `v<digits>` key (either case), if the key has that shape.
pub fn canonical_digits(key: &str) -> Option<&str> {
    let digits = key.strip_prefix('v').or_else(|| key.strip_prefix('V'))?;
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}

/// Expand `answers` with the aliases `strategy` produces for each
/// `v<digits>` key. Other keys pass through untouched.
///
/// Keys are visited in sorted order. Under [`AliasPolicy::PreserveExplicit`]
/// an alias is added only when absent, so when two source keys (e.g. `V7`
/// and `v7`) would generate the same alias the first in sort order wins.
pub fn expand_answers(
    answers: &AnswerMap,
    strategy: &dyn AliasStrategy,
    policy: AliasPolicy,
) -> ExpandedAnswerMap {
    let mut expanded = answers.clone();

    for (key, value) in answers {
        let Some(digits) = canonical_digits(key) else {
            continue;
        };

        for alias in strategy.aliases(digits) {
            if alias == *key {
                continue;
            }
            match policy {
                AliasPolicy::Overwrite => {
                    expanded.insert(alias, value.clone());
                }
                AliasPolicy::PreserveExplicit => {
                    if answers.contains_key(&alias) {
                        debug!("Keeping explicit answer for {alias}");
                        continue;
                    }
                    expanded.entry(alias).or_insert_with(|| value.clone());
                }
            }
        }
    }

    expanded
}
