//! Word (`.docx`) package access.
//!
//! This module provides:
//! - Opening a `.docx` archive and reading individual parts
//! - Rewriting selected parts into a fresh archive
//! - A structural view of the document body (tables, rows, cells, paragraphs)

pub mod model;
pub mod package;
pub mod reader;

pub use model::{Cell, Document, Paragraph, Row, Table};
pub use package::{DOCUMENT_PART, DocxError, DocxPackage};
pub use reader::{load_document, read_document};
