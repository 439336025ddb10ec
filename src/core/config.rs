use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};
use tracing::{debug, warn};

pub const API_KEY_VAR: &str = "API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: "https://openexchangerates.org".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_minutes: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            ttl_minutes: crate::core::cache::DEFAULT_TTL_MINUTES,
        }
    }
}

impl CacheConfig {
    /// The validity window as a duration. Rejects negative or oversized values.
    pub fn ttl(&self) -> Result<chrono::Duration> {
        if self.ttl_minutes < 0 {
            bail!("cache.ttl_minutes must not be negative, got {}", self.ttl_minutes);
        }
        chrono::Duration::try_minutes(self.ttl_minutes).context("cache.ttl_minutes out of range")
    }
}

/// Values the form starts with.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct FormDefaults {
    pub amount: String,
    pub from: String,
    pub to: String,
}

impl Default for FormDefaults {
    fn default() -> Self {
        FormDefaults {
            amount: "1.00".to_string(),
            from: "CAD".to_string(),
            to: "USD".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
    pub defaults: FormDefaults,
}

impl AppConfig {
    /// Loads the default config file, or defaults when there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxtui", "fxtui")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

/// Reads the credential, loading a `.env` from the working directory or its
/// parent first. An empty value counts as absent.
pub fn load_api_key() -> Option<String> {
    let candidates = [PathBuf::from(".env"), Path::new("..").join(".env")];
    if let Some(env_file) = candidates.iter().find(|p| p.exists()) {
        if let Err(e) = dotenv::from_path(env_file) {
            warn!(path = %env_file.display(), "Error loading .env file: {e}");
        }
    }

    env::var(API_KEY_VAR).ok().filter(|key| !key.trim().is_empty())
}
