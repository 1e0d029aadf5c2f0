//! Streaming reader from `word/document.xml` to [`Document`].

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use super::model::{Cell, Document, Paragraph, Row, Table};
use super::package::{DOCUMENT_PART, DocxError, DocxPackage};

/// Open the package at `path` and read its body structure.
pub fn load_document(path: &Path) -> Result<Document, DocxError> {
    let mut package = DocxPackage::open(path)?;
    let bytes = package.part(DOCUMENT_PART)?;
    let xml = String::from_utf8(bytes).map_err(|e| DocxError::Xml {
        part: DOCUMENT_PART.to_string(),
        message: e.to_string(),
    })?;
    read_document(&xml)
}

/// Parse the body of a WordprocessingML document.
///
/// Only body-level tables and paragraphs are surfaced. Paragraph text is the
/// concatenation of its runs (`w:tab` as a tab, `w:br`/`w:cr` as a newline).
/// Text boxes anchored inside a run and tables nested inside a cell do not
/// contribute to the text of their host.
pub fn read_document(xml: &str) -> Result<Document, DocxError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text_start = false;
    reader.config_mut().trim_text_end = false;

    let mut state = BodyState::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => state.open(&e),
            Ok(Event::Empty(e)) => {
                state.open(&e);
                state.close(e.name().as_ref());
            }
            Ok(Event::End(e)) => state.close(e.name().as_ref()),
            Ok(Event::Text(e)) => {
                if state.in_text {
                    let text = e.unescape().map_err(|err| xml_error(&err))?;
                    state.text.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(xml_error(&e)),
        }
    }

    debug!(
        "Read document body: {} tables, {} paragraphs",
        state.doc.tables.len(),
        state.doc.paragraphs.len()
    );
    Ok(state.doc)
}

fn xml_error(err: &impl std::fmt::Display) -> DocxError {
    DocxError::Xml { part: DOCUMENT_PART.to_string(), message: err.to_string() }
}

#[derive(Default)]
struct BodyState {
    doc: Document,
    table_depth: usize,
    paragraph_depth: usize,
    run_depth: usize,
    in_text: bool,
    text: String,
    table: Option<Table>,
    row: Option<Row>,
    cell: Option<Cell>,
}

impl BodyState {
    /// Whether the current position contributes to the outline we build.
    fn collecting(&self) -> bool {
        self.table_depth <= 1 && self.paragraph_depth == 1 && self.run_depth > 0
    }

    /// Tables inside a body paragraph belong to a text box and are skipped.
    fn tracks_table(&self) -> bool {
        self.paragraph_depth == 0 || self.table_depth > 0
    }

    fn open(&mut self, e: &BytesStart<'_>) {
        match e.name().as_ref() {
            b"w:tbl" if self.tracks_table() => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.table = Some(Table::default());
                }
            }
            b"w:tr" if self.table_depth == 1 => self.row = Some(Row::default()),
            b"w:tc" if self.table_depth == 1 => self.cell = Some(Cell::default()),
            b"w:p" => {
                self.paragraph_depth += 1;
                if self.paragraph_depth == 1 {
                    self.text.clear();
                }
            }
            b"w:r" => self.run_depth += 1,
            b"w:t" if self.collecting() => self.in_text = true,
            b"w:tab" if self.collecting() => self.text.push('\t'),
            b"w:br" | b"w:cr" if self.collecting() => self.text.push('\n'),
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"w:t" => self.in_text = false,
            b"w:r" => self.run_depth = self.run_depth.saturating_sub(1),
            b"w:p" => {
                if self.paragraph_depth == 1 {
                    self.finish_paragraph();
                }
                self.paragraph_depth = self.paragraph_depth.saturating_sub(1);
            }
            b"w:tc" if self.table_depth == 1 => {
                if let (Some(cell), Some(row)) = (self.cell.take(), self.row.as_mut()) {
                    row.cells.push(cell);
                }
            }
            b"w:tr" if self.table_depth == 1 => {
                if let (Some(row), Some(table)) = (self.row.take(), self.table.as_mut()) {
                    table.rows.push(row);
                }
            }
            b"w:tbl" if self.tracks_table() => {
                if self.table_depth == 1
                    && let Some(table) = self.table.take()
                {
                    self.doc.tables.push(table);
                }
                self.table_depth = self.table_depth.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn finish_paragraph(&mut self) {
        let paragraph = Paragraph::new(std::mem::take(&mut self.text));
        match self.table_depth {
            0 => self.doc.paragraphs.push(paragraph),
            1 => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.paragraphs.push(paragraph);
                }
            }
            _ => {}
        }
    }
}
