use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::templates::engine::UndefinedPolicy;
use crate::vars::aliases::AliasPolicy;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    /// Base directory; `{{root}}` in the other paths expands to it.
    pub root: String,
    /// Directory holding `.docx` templates (read-only).
    pub templates_dir: String,
    /// Directory rendered documents are written to.
    pub output_dir: String,
}

/// Rendering behaviour shared by every profile.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct RenderConfig {
    /// What happens to tags without an answer.
    #[serde(default)]
    pub undefined: UndefinedPolicy,
    /// Let generated aliases replace keys the caller set explicitly.
    #[serde(default)]
    pub overwrite_explicit_aliases: bool,
}

impl RenderConfig {
    pub fn alias_policy(&self) -> AliasPolicy {
        if self.overwrite_explicit_aliases {
            AliasPolicy::Overwrite
        } else {
            AliasPolicy::PreserveExplicit
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    pub root: PathBuf,
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}
