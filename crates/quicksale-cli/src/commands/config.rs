use std::path::{Path, PathBuf};

use quicksale_core::util::{is_http_url, normalize_text_option};

use crate::cli::ConfigCommands;
use crate::config::{default_config_path, CliConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, config_path: Option<&Path>) -> Result<(), CliError> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    match command {
        ConfigCommands::Init {
            supabase_url,
            supabase_anon_key,
            queue_db,
        } => {
            let existing = CliConfig::load_from_path(&path)?;
            let updated = apply_init(existing, supabase_url, supabase_anon_key, queue_db)?;
            updated.save_to_path(&path)?;
            println!("Saved config to {}", path.display());
            if updated.supabase().is_err() {
                println!("Supabase URL and anon key are still missing");
            }
            Ok(())
        }
        ConfigCommands::Show => {
            let mut config = CliConfig::load_from_path(&path)?;
            config.apply_env_overrides(|name| std::env::var(name).ok());
            for line in describe_config(&config, &path) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

/// Merge explicit `config init` values over the existing file.
pub fn apply_init(
    mut config: CliConfig,
    supabase_url: Option<String>,
    supabase_anon_key: Option<String>,
    queue_db: Option<PathBuf>,
) -> Result<CliConfig, CliError> {
    if let Some(url) = normalize_text_option(supabase_url) {
        if !is_http_url(&url) {
            return Err(CliError::Config(
                "Supabase URL must include http:// or https://".to_string(),
            ));
        }
        config.supabase_url = Some(url);
    }
    if let Some(key) = normalize_text_option(supabase_anon_key) {
        config.supabase_anon_key = Some(key);
    }
    if let Some(path) = queue_db {
        config.db_path = Some(path);
    }
    Ok(config)
}

pub fn describe_config(config: &CliConfig, path: &Path) -> Vec<String> {
    let anon_key = if config.supabase_anon_key.is_some() {
        "[REDACTED]"
    } else {
        "(not set)"
    };
    vec![
        format!("config file:      {}", path.display()),
        format!(
            "supabase url:     {}",
            config.supabase_url.as_deref().unwrap_or("(not set)")
        ),
        format!("supabase anon key: {anon_key}"),
        format!("queue database:   {}", config.resolve_db_path(None).display()),
        format!("remote timeout:   {}s", config.sync.remote_timeout.as_secs()),
        format!("retry interval:   {}s", config.sync.retry_interval.as_secs()),
        format!("probe interval:   {}s", config.sync.probe_interval.as_secs()),
        format!("idempotent inserts: {}", config.sync.idempotent_inserts),
    ]
}
