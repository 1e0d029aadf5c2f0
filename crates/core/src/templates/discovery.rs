use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// File extension of renderable templates.
pub const TEMPLATE_EXTENSION: &str = "docx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    /// Path relative to the templates directory, `/`-separated, without extension.
    pub logical_name: String,
    pub path: PathBuf,
}


#[derive(Debug, Error)]
pub enum TemplateDiscoveryError {
    #[error("templates directory does not exist: {0}")]
    MissingDir(String),

    #[error("failed to read templates directory {0} : {1}")]
    WalkError(String, #[source] walkdir::Error),
}

/// List every `.docx` template under `root`, sorted by logical name.
///
/// Hidden entries and Word lock files (`~$name.docx`) are skipped.
pub fn discover_templates(root: &Path) -> Result<Vec<TemplateInfo>, TemplateDiscoveryError> {
    if !root.is_dir() {
        return Err(TemplateDiscoveryError::MissingDir(root.display().to_string()));
    }

    let mut out = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
    {
        let entry = entry
            .map_err(|e| TemplateDiscoveryError::WalkError(root.display().to_string(), e))?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_template_file(path) {
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(path);
        out.push(TemplateInfo {
            logical_name: logical_name_from_relative(rel),
            path: path.to_path_buf(),
        });
    }

    out.sort_by(|a, b| a.logical_name.cmp(&b.logical_name));
    Ok(out)
}

fn is_template_file(path: &Path) -> bool {
    let is_docx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(TEMPLATE_EXTENSION));
    let is_lock_file =
        path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.starts_with("~$"));
    is_docx && !is_lock_file
}

fn logical_name_from_relative(rel: &Path) -> String {
    let without_ext = rel.with_extension("");
    without_ext
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
