//! Persistent CLI configuration.

use std::path::{Path, PathBuf};

use quicksale_core::config::{SupabaseConfig, SyncSettings};
use quicksale_core::util::normalize_text_option;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "config.json";
const APP_DIR_NAME: &str = "quicksale";

pub const SUPABASE_URL_ENV: &str = "QUICKSALE_SUPABASE_URL";
pub const SUPABASE_ANON_KEY_ENV: &str = "QUICKSALE_SUPABASE_ANON_KEY";
pub const DB_PATH_ENV: &str = "QUICKSALE_DB_PATH";

#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_anon_key: Option<String>,
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    #[serde(default)]
    pub sync: SyncSettings,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, CliError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or_else(|| CliError::Config("Failed to resolve CLI config directory".to_string()))
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join("quicksale.db")
}

impl CliConfig {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, CliError> {
        let path = match explicit_path {
            Some(path) => path.to_path_buf(),
            None => default_config_path()?,
        };
        let mut config = Self::load_from_path(&path)?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self {
                version: default_config_version(),
                ..Self::default()
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            CliError::Config(format!(
                "Failed to read config at {}: {error}",
                path.display()
            ))
        })?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            CliError::Config(format!(
                "Failed to parse config at {}: {error}",
                path.display()
            ))
        })?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                CliError::Config(format!(
                    "Failed to create config directory {}: {error}",
                    parent.display()
                ))
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)?;
        std::fs::write(path, serialized).map_err(|error| {
            CliError::Config(format!(
                "Failed to write config at {}: {error}",
                path.display()
            ))
        })
    }

    /// Environment values win over the file; blank values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = normalize_text_option(lookup(SUPABASE_URL_ENV)) {
            self.supabase_url = Some(url);
        }
        if let Some(key) = normalize_text_option(lookup(SUPABASE_ANON_KEY_ENV)) {
            self.supabase_anon_key = Some(key);
        }
        if let Some(path) = normalize_text_option(lookup(DB_PATH_ENV)) {
            self.db_path = Some(PathBuf::from(path));
        }
    }

    pub fn supabase(&self) -> Result<SupabaseConfig, CliError> {
        self.supabase_if_configured()?.ok_or(CliError::NotConfigured)
    }

    /// `None` when the URL or key is missing; an error when present but invalid.
    pub fn supabase_if_configured(&self) -> Result<Option<SupabaseConfig>, CliError> {
        match (&self.supabase_url, &self.supabase_anon_key) {
            (Some(url), Some(anon_key)) => {
                Ok(Some(SupabaseConfig::new(url.as_str(), anon_key.as_str())?))
            }
            _ => Ok(None),
        }
    }

    /// `--db-path` first, then config/env, then the per-user data directory.
    pub fn resolve_db_path(&self, cli_db_path: Option<PathBuf>) -> PathBuf {
        cli_db_path
            .or_else(|| self.db_path.clone())
            .unwrap_or_else(default_db_path)
    }

    fn validate(&self) -> Result<(), CliError> {
        self.sync.validate()?;
        Ok(())
    }

    fn normalize(&mut self) {
        self.supabase_url = normalize_text_option(self.supabase_url.take())
            .map(|url| url.trim_end_matches('/').to_string());
        self.supabase_anon_key = normalize_text_option(self.supabase_anon_key.take());
    }
}
