pub mod analyze;
pub mod doctor;
pub mod generate;
pub mod list_templates;

use crate::logging;
use docfill_core::config::loader::{default_config_path, ConfigLoader};
use docfill_core::config::types::ResolvedConfig;
use docfill_core::EngineError;
use std::fmt::Display;
use std::path::Path;

/// Load config and start logging, or print the failure and exit.
pub fn load_config(cmd: &str, config: Option<&Path>, profile: Option<&str>) -> ResolvedConfig {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            logging::init(&rc);
            rc
        }
        Err(e) => {
            println!("FAIL docfill {cmd}");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}

pub fn fail(cmd: &str, err: impl Display, code: i32) -> ! {
    logging::flush();
    println!("FAIL docfill {cmd}");
    println!("{err}");
    std::process::exit(code);
}

/// Missing templates exit with 2, everything else with 1.
pub fn fail_engine(cmd: &str, err: &EngineError) -> ! {
    tracing::debug!("{cmd} failed: {err:?}");
    let code = match err {
        EngineError::TemplateNotFound(_) => 2,
        _ => 1,
    };
    fail(cmd, err, code)
}
