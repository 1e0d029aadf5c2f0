use std::path::Path;

use thiserror::Error;

use crate::templates::discovery::{
    TEMPLATE_EXTENSION, TemplateDiscoveryError, TemplateInfo, discover_templates,
};

#[derive(Debug, Error)]
pub enum TemplateRepoError {
    #[error(transparent)]
    Discovery(#[from] TemplateDiscoveryError),

    #[error("template not found: {0}")]
    NotFound(String),
}

pub struct TemplateRepository {
    pub templates: Vec<TemplateInfo>,
}

impl TemplateRepository {
    pub fn new(root: &Path) -> Result<Self, TemplateDiscoveryError> {
        let templates = discover_templates(root)?;
        Ok(Self { templates })
    }

    /// Look a template up by logical name (`leases/commercial`) or by
    /// relative file name (`leases/commercial.docx`).
    ///
    /// Only discovered templates resolve, so names can never point outside
    /// the templates directory.
    pub fn get_by_name(&self, name: &str) -> Result<&TemplateInfo, TemplateRepoError> {
        let wanted = strip_template_extension(&name.replace('\\', "/")).to_string();
        self.templates
            .iter()
            .find(|t| t.logical_name == wanted)
            .ok_or_else(|| TemplateRepoError::NotFound(name.to_string()))
    }
}

fn strip_template_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case(TEMPLATE_EXTENSION) => stem,
        _ => name,
    }
}
