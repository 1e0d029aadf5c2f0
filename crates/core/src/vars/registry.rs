//! Variable registry: deduplicated, context-enriched tags of one document.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::matcher::find_tags;
use crate::docx::{Cell, Document};

/// Separator between cell texts in a table-row context string.
pub const CONTEXT_SEPARATOR: &str = " | ";

/// Sort key given to ids whose digits do not fit a `u64`.
const UNPARSEABLE_ORDER: u64 = u64::MAX;

/// Where a variable was first found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    TableRow,
    Paragraph,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::TableRow => "table_row",
            SourceKind::Paragraph => "paragraph",
        }
    }
}

/// One discovered placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Normalized id, always lowercase `v<digits>`.
    pub id: String,
    /// The tag as written in the document, e.g. `V12`.
    pub original_tag: String,
    /// Row text (cells joined by `" | "`) or paragraph text.
    pub context: String,
    #[serde(rename = "type")]
    pub source_kind: SourceKind,
}

impl Variable {
    /// Numeric part of the id, used for ordering.
    #[must_use]
    pub fn number(&self) -> Option<u64> {
        self.id.strip_prefix('v').and_then(|digits| digits.parse().ok())
    }
}

/// Registry keyed by normalized id. The first insert for an id wins.
#[derive(Debug, Default)]
pub struct VariableRegistry {
    variables: Vec<Variable>,
    seen: HashSet<String>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `variable` unless its id is already registered.
    ///
    /// Returns `false` when the variable was discarded as a duplicate.
    pub fn insert(&mut self, variable: Variable) -> bool {
        if self.seen.contains(&variable.id) {
            return false;
        }
        self.seen.insert(variable.id.clone());
        self.variables.push(variable);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Variables ordered by the integer value of their id.
    ///
    /// Ids that cannot be parsed go last, in discovery order.
    pub fn into_sorted(self) -> Vec<Variable> {
        let mut variables = self.variables;
        variables.sort_by_key(|v| v.number().unwrap_or(UNPARSEABLE_ORDER));
        variables
    }
}

/// Replace non-breaking spaces and trim.
pub fn clean_text(text: &str) -> String {
    text.replace('\u{a0}', " ").trim().to_string()
}

/// Build the ordered variable list of a document.
///
/// Tables are scanned first, row by row, with the whole row as context;
/// free-standing paragraphs only fill in ids no table row provided.
pub fn collect_variables(doc: &Document) -> Vec<Variable> {
    let mut registry = VariableRegistry::new();

    for table in &doc.tables {
        for row in &table.rows {
            let cell_texts: Vec<String> =
                row.cells.iter().map(|cell| clean_text(&cell.text())).collect();
            let row_context = cell_texts
                .iter()
                .filter(|t| !t.is_empty())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(CONTEXT_SEPARATOR);

            for text in &cell_texts {
                register_tags(&mut registry, text, &row_context, SourceKind::TableRow);
            }
        }
    }

    for paragraph in &doc.paragraphs {
        let text = clean_text(paragraph.text());
        register_tags(&mut registry, &text, &text, SourceKind::Paragraph);
    }

    debug!("Collected {} variables", registry.len());
    registry.into_sorted()
}

fn register_tags(
    registry: &mut VariableRegistry,
    text: &str,
    context: &str,
    source_kind: SourceKind,
) {
    for tag in find_tags(text) {
        let variable = Variable {
            id: tag.id(),
            original_tag: tag.original_tag,
            context: context.to_string(),
            source_kind,
        };
        let id = variable.id.clone();
        if !registry.insert(variable) {
            debug!("Skipping repeated {} from {}", id, source_kind.as_str());
        }
    }
}
