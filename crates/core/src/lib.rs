#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

//! Placeholder discovery and rendering for Word (`.docx`) templates.
//!
//! - [`docx`] reads the package and the structure of the document body
//! - [`vars`] finds `{{ v<digits> }}` tags, builds the variable registry and
//!   expands answer keys with alias spellings
//! - [`templates`] discovers templates, renders them and names the output
//! - [`generator`] ties it together: analyze a template, generate a document
//! - [`config`] loads the TOML configuration

pub mod config;
pub mod docx;
pub mod generator;
pub mod templates;
pub mod vars;

pub use generator::{EngineError, GeneratedDocument, Generator, analyze_document};
