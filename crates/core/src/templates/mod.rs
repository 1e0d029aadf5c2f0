//! Template handling: discovery, lookup, rendering and output naming.

pub mod discovery;
pub mod engine;
pub mod output;
pub mod repository;

pub use discovery::{TemplateDiscoveryError, TemplateInfo, discover_templates};
pub use engine::{DocxRenderer, RenderError, TemplateRenderer, UndefinedPolicy, render_string};
pub use output::{output_file_name, prepare_output_path};
pub use repository::{TemplateRepoError, TemplateRepository};
