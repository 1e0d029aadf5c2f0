use crate::config::types::{ConfigFile, LoggingConfig, Profile, RenderConfig, ResolvedConfig};
use shellexpand::full;
use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::home_dir;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("no profiles defined in config")]
    NoProfiles,

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("environment variable '{var}' used in '{input}' is not set")]
    UndefinedVar { var: String, input: String },
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(
        config_path: Option<&Path>,
        profile_override: Option<&str>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => default_config_path(),
        };

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let s = fs::read_to_string(&path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

        let cf: ConfigFile = toml::from_str(&s)
            .map_err(|e| ConfigError::ParseError(path.display().to_string(), e))?;

        if cf.version != 1 {
            return Err(ConfigError::BadVersion(cf.version));
        }
        if cf.profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }

        let active = profile_override
            .map(ToOwned::to_owned)
            .or(cf.profile.clone())
            .unwrap_or_else(|| "default".to_string());

        let prof = cf
            .profiles
            .get(&active)
            .ok_or_else(|| ConfigError::ProfileNotFound(active.clone()))?;

        debug!("Loaded config {} (profile {})", path.display(), active);
        Self::resolve_profile(&active, prof, &cf.render, &cf.logging)
    }

    fn resolve_profile(
        active: &str,
        prof: &Profile,
        render: &RenderConfig,
        log_cfg: &LoggingConfig,
    ) -> Result<ResolvedConfig, ConfigError> {
        let root = expand_path(&prof.root)?;
        let sub = |s: &str| s.replace("{{root}}", &root.to_string_lossy());

        let templates_dir = expand_path(&sub(&prof.templates_dir))?;
        let output_dir = expand_path(&sub(&prof.output_dir))?;

        let file = match &log_cfg.file {
            Some(file) => Some(expand_path(&sub(&file.to_string_lossy()))?),
            None => None,
        };
        let logging = LoggingConfig { file, ..log_cfg.clone() };

        Ok(ResolvedConfig {
            active_profile: active.to_string(),
            root,
            templates_dir,
            output_dir,
            render: render.clone(),
            logging,
        })
    }
}

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("docfill").join("config.toml");
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("docfill").join("config.toml")
}

/// Expand `~` and `$VAR` / `${VAR}` in a configured path.
fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|e| ConfigError::UndefinedVar {
        var: e.var_name,
        input: input.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}
