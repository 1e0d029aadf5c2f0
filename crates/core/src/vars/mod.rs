//! Placeholder variables: tag matching, registry building and answer aliasing.
//!
//! - [`matcher`] recognizes `{{ v<digits> }}` tags in plain text
//! - [`registry`] walks a document and builds the ordered variable list
//! - [`aliases`] expands an answer map with alternate key spellings

pub mod aliases;
pub mod matcher;
pub mod registry;

pub use aliases::{
    AliasPolicy, AliasStrategy, AnswerMap, ExpandedAnswerMap, StandardAliases,
    canonical_digits, expand_answers,
};
pub use matcher::{TagMatch, find_tags};
pub use registry::{
    CONTEXT_SEPARATOR, SourceKind, Variable, VariableRegistry, clean_text, collect_variables,
};
