//! # configs
//!
//! Layered configuration for post-index:
//!
//! 1. built-in defaults
//! 2. `config/default.toml` (optional)
//! 3. `config/local.toml` (optional, not committed)
//! 4. environment, e.g. `POST_INDEX__BACKEND__KIND=redis`
//!
//! A `.env` file is read first so its variables take part in step 4.

use std::path::{Path, PathBuf};

use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use domains::SortMode;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const ENV_PREFIX: &str = "POST_INDEX";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    Redis,
}

#[derive(Debug, Deserialize)]
pub struct BackendSettings {
    pub kind: BackendKind,
    /// Required when `kind = "redis"`.
    #[serde(default)]
    pub redis_url: Option<SecretString>,
    pub pool_size: usize,
    /// JSON file loaded into the in-memory backend at startup.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human readable output.
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostSettings {
    /// Sort mode for viewers without a stored preference.
    pub default_sort: SortMode,
    pub summary_strip_tags: bool,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub backend: BackendSettings,
    pub logging: LoggingSettings,
    pub posts: PostSettings,
}

fn with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Ok(Config::builder()
        .set_default("backend.kind", "memory")?
        .set_default("backend.pool_size", 16)?
        .set_default("logging.level", "info")?
        .set_default("logging.json", false)?
        .set_default("posts.default_sort", "oldest_to_newest")?
        .set_default("posts.summary_strip_tags", false)?)
}

impl Settings {
    /// Every layer rooted at `./config`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("config"))
    }

    /// Loads `.env`, then every layer rooted at `dir`.
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        let settings: Settings = with_defaults()?
            .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false))
            .add_source(File::with_name(&dir.join("local").to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults overlaid with a TOML document. Ignores files and environment.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let settings: Settings = with_defaults()?
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.kind == BackendKind::Redis && self.backend.redis_url.is_none() {
            return Err(ConfigError::Invalid(
                "backend.redis_url is required for the redis backend".into(),
            ));
        }
        if self.backend.pool_size == 0 {
            return Err(ConfigError::Invalid("backend.pool_size must be at least 1".into()));
        }
        Ok(())
    }
}
