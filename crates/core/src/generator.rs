//! End-to-end operations: scan a template for variables, render it with
//! answers and write the result.
//!
//! Every call builds its own registry and answer map, so a [`Generator`] can
//! be shared between threads. Nothing is retried and nothing is written until
//! the whole document has rendered.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::types::ResolvedConfig;
use crate::docx::{DocxError, load_document};
use crate::templates::discovery::{TemplateDiscoveryError, TemplateInfo};
use crate::templates::engine::{DocxRenderer, RenderError, TemplateRenderer};
use crate::templates::output::{output_file_name, prepare_output_path};
use crate::templates::repository::{TemplateRepoError, TemplateRepository};
use crate::vars::aliases::{
    AliasPolicy, AliasStrategy, AnswerMap, StandardAliases, expand_answers,
};
use crate::vars::registry::{Variable, collect_variables};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("failed to parse document {path}: {source}")]
    DocumentParse {
        path: PathBuf,
        #[source]
        source: DocxError,
    },

    #[error("failed to render {path}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    #[error("failed to write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Discovery(TemplateDiscoveryError),
}

/// A document written by [`Generator::generate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedDocument {
    pub path: PathBuf,
    pub file_name: String,
}

/// Scan a `.docx` file and return its variables in numeric order.
pub fn analyze_document(path: &Path) -> Result<Vec<Variable>, EngineError> {
    if !path.is_file() {
        return Err(EngineError::TemplateNotFound(path.display().to_string()));
    }
    let doc = load_document(path)
        .map_err(|source| EngineError::DocumentParse { path: path.to_path_buf(), source })?;
    let variables = collect_variables(&doc);
    debug!("Found {} variables in {}", variables.len(), path.display());
    Ok(variables)
}

pub struct Generator {
    templates_dir: PathBuf,
    output_dir: PathBuf,
    alias_policy: AliasPolicy,
    renderer: Box<dyn TemplateRenderer + Send + Sync>,
    aliases: Box<dyn AliasStrategy + Send + Sync>,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("templates_dir", &self.templates_dir)
            .field("output_dir", &self.output_dir)
            .field("alias_policy", &self.alias_policy)
            .finish_non_exhaustive()
    }
}

impl Generator {
    /// Generator with the built-in renderer and the standard alias family.
    pub fn new(templates_dir: &Path, output_dir: &Path) -> Self {
        Self {
            templates_dir: templates_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            alias_policy: AliasPolicy::default(),
            renderer: Box::new(DocxRenderer::default()),
            aliases: Box::new(StandardAliases),
        }
    }

    pub fn from_config(cfg: &ResolvedConfig) -> Self {
        Self::new(&cfg.templates_dir, &cfg.output_dir)
            .with_renderer(DocxRenderer::new(cfg.render.undefined))
            .with_alias_policy(cfg.render.alias_policy())
    }

    #[must_use]
    pub fn with_renderer(
        mut self,
        renderer: impl TemplateRenderer + Send + Sync + 'static,
    ) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    #[must_use]
    pub fn with_aliases(mut self, aliases: impl AliasStrategy + Send + Sync + 'static) -> Self {
        self.aliases = Box::new(aliases);
        self
    }

    #[must_use]
    pub fn with_alias_policy(mut self, policy: AliasPolicy) -> Self {
        self.alias_policy = policy;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// All templates available to this generator.
    pub fn templates(&self) -> Result<Vec<TemplateInfo>, EngineError> {
        Ok(self.repository(None)?.templates)
    }

    /// Resolve a template by logical name or file name.
    pub fn resolve(&self, name: &str) -> Result<TemplateInfo, EngineError> {
        let repo = self.repository(Some(name))?;
        match repo.get_by_name(name) {
            Ok(info) => Ok(info.clone()),
            Err(TemplateRepoError::NotFound(n)) => Err(EngineError::TemplateNotFound(n)),
            Err(TemplateRepoError::Discovery(e)) => Err(EngineError::Discovery(e)),
        }
    }

    /// Variables of the named template.
    pub fn analyze(&self, name: &str) -> Result<Vec<Variable>, EngineError> {
        let info = self.resolve(name)?;
        analyze_document(&info.path)
    }

    /// Render the named template with `answers`, timestamped now.
    pub fn generate(
        &self,
        name: &str,
        answers: &AnswerMap,
    ) -> Result<GeneratedDocument, EngineError> {
        self.generate_at(name, answers, &Local::now())
    }

    /// Render the named template with `answers`, timestamped `now`.
    pub fn generate_at<Tz>(
        &self,
        name: &str,
        answers: &AnswerMap,
        now: &DateTime<Tz>,
    ) -> Result<GeneratedDocument, EngineError>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let info = self.resolve(name)?;
        self.generate_from_path(&info.path, answers, now)
    }

    /// Render the template file at `template` with `answers`.
    pub fn generate_from_path<Tz>(
        &self,
        template: &Path,
        answers: &AnswerMap,
        now: &DateTime<Tz>,
    ) -> Result<GeneratedDocument, EngineError>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        if !template.is_file() {
            return Err(EngineError::TemplateNotFound(template.display().to_string()));
        }

        let expanded = expand_answers(answers, self.aliases.as_ref(), self.alias_policy);
        debug!("Expanded {} answers to {} keys", answers.len(), expanded.len());

        let bytes = self.renderer.render(template, &expanded).map_err(|e| match e {
            RenderError::Document(source) => {
                EngineError::DocumentParse { path: template.to_path_buf(), source }
            }
            source => EngineError::Render { path: template.to_path_buf(), source },
        })?;

        let template_name = template
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let file_name = output_file_name(&template_name, now);
        let path = prepare_output_path(&self.output_dir, &file_name).map_err(|source| {
            EngineError::OutputWrite { path: self.output_dir.clone(), source }
        })?;
        fs::write(&path, bytes)
            .map_err(|source| EngineError::OutputWrite { path: path.clone(), source })?;

        info!("Document generated: {}", path.display());
        Ok(GeneratedDocument { path, file_name })
    }

    fn repository(&self, wanted: Option<&str>) -> Result<TemplateRepository, EngineError> {
        match (TemplateRepository::new(&self.templates_dir), wanted) {
            (Ok(repo), _) => Ok(repo),
            // Without a templates directory no template can exist.
            (Err(TemplateDiscoveryError::MissingDir(dir)), Some(name)) => {
                debug!("Templates directory {dir} is missing");
                Err(EngineError::TemplateNotFound(name.to_string()))
            }
            (Err(e), _) => Err(EngineError::Discovery(e)),
        }
    }
}
