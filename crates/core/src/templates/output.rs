//! Output file naming.
//!
//! Rendered documents are named `<template stem>_Final_<YYYYMMDD_HHMMSS>.docx`.
//! The timestamp has one-second resolution: two renders of the same template
//! within the same second get the same name and the later one wins.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

/// `strftime` pattern of the timestamp suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Build the output file name for `template_name` rendered at `now`.
///
/// Only the file stem of `template_name` is used; any directories and the
/// extension are dropped.
pub fn output_file_name<Tz>(template_name: &str, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let stem = Path::new(template_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| template_name.to_string());
    format!("{stem}_Final_{}.docx", now.format(TIMESTAMP_FORMAT))
}

/// Ensure `dir` exists and return the full path for `file_name` inside it.
pub fn prepare_output_path(dir: &Path, file_name: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    Ok(dir.join(file_name))
}
