//! Configuration: `config.toml` in the platform config dir, then environment,
//! then command-line overrides.

pub mod schema;

pub use schema::{ApiConfig, Config, ListingConfig, SessionConfig, StorageConfig, DEFAULT_API_URL};

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use thiserror::Error;
use tracing::debug;

/// Overrides `api.base_url`.
pub const API_URL_ENV: &str = "OEUVREGUARD_API_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no home directory; set storage.data_dir or pass --config")]
    NoProjectDirs,
    #[error("invalid config {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "oeuvreguard", "oeuvreguard")
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    project_dirs()
        .map(|d| d.config_dir().join("config.toml"))
        .ok_or(ConfigError::NoProjectDirs)
}

fn ttl_from_hours(hours: u64) -> Option<chrono::Duration> {
    if hours == 0 {
        return None;
    }
    i64::try_from(hours).ok().and_then(chrono::Duration::try_hours)
}

impl Config {
    /// Load from `path`, or the default location. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        config
            .validate()
            .map_err(|message| ConfigError::Invalid { path, message })?;
        Ok(config)
    }

    /// Range checks serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(hours) = self.session.ttl_hours {
            if hours == 0 {
                return Err(
                    "session.ttl_hours must be at least 1; omit it to keep sessions until logout"
                        .into(),
                );
            }
            if ttl_from_hours(hours).is_none() {
                return Err(format!("session.ttl_hours = {hours} is out of range"));
            }
        }
        Ok(())
    }

    /// Apply the environment and `--api-url`, in that order of precedence.
    pub fn with_overrides(mut self, env_url: Option<String>, cli_url: Option<String>) -> Self {
        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(url) = cli_url {
            self.api.base_url = url;
        }
        self
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// JSON schema of the config file.
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Config)).unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs.max(1))
    }

    /// Session lifetime; `None` keeps sessions until logout. Values
    /// rejected by [`validate`](Self::validate) also yield `None`.
    pub fn session_ttl(&self) -> Option<chrono::Duration> {
        self.session.ttl_hours.and_then(ttl_from_hours)
    }

    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.data_dir {
            Some(dir) => Ok(PathBuf::from(shellexpand::tilde(dir).to_string())),
            None => project_dirs()
                .map(|d| d.data_dir().to_path_buf())
                .ok_or(ConfigError::NoProjectDirs),
        }
    }

    pub fn artifacts_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.artifacts_dir {
            Some(dir) => Ok(PathBuf::from(shellexpand::tilde(dir).to_string())),
            None => Ok(self.data_dir()?.join("artifacts")),
        }
    }

    pub fn session_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join("session.json"))
    }
}
