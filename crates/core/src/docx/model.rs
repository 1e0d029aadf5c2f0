//! Structural model of a document body.
//!
//! Only what placeholder discovery needs is kept: body-level tables in
//! document order and body-level paragraphs in document order. Each node
//! exposes its flattened text, i.e. the text of all runs concatenated, so a
//! tag that Word split across several runs still reads as one string.

/// Body of a `.docx` document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Top-level tables, in document order.
    pub tables: Vec<Table>,
    /// Top-level paragraphs (outside any table), in document order.
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub paragraphs: Vec<Paragraph>,
}

impl Cell {
    /// Text of every paragraph in the cell, one per line.
    #[must_use]
    pub fn text(&self) -> String {
        self.paragraphs.iter().map(Paragraph::text).collect::<Vec<_>>().join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Flattened run text of the paragraph.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}
