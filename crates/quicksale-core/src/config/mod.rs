//! Remote store and sync configuration.
//!
//! `SupabaseConfig` identifies the hosted table service; `SyncSettings` tunes
//! how the coordinator talks to it. Both are plain data so front-ends can
//! load them from whatever source they prefer (file, env, build config).

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::{is_http_url, normalize_text_option};

const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 30;
const DEFAULT_PROBE_INTERVAL_SECS: u64 = 15;

/// Connection details for the Supabase REST endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl SupabaseConfig {
    /// Validate and normalize the project URL and anon key.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> crate::Result<Self> {
        let url = normalize_text_option(Some(url.into()))
            .ok_or_else(|| crate::Error::Config("Supabase URL must not be empty".to_string()))?;
        if !is_http_url(&url) {
            return Err(crate::Error::Config(
                "Supabase URL must include http:// or https://".to_string(),
            ));
        }
        let anon_key = normalize_text_option(Some(anon_key.into())).ok_or_else(|| {
            crate::Error::Config("Supabase anon key must not be empty".to_string())
        })?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }

    /// Base URL of the PostgREST API (`{url}/rest/v1`).
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

/// Timing and delivery knobs for the sync coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Upper bound on a single remote write before it counts as failed
    #[serde(default = "default_remote_timeout", with = "duration_secs")]
    pub remote_timeout: Duration,
    /// How often a failed flush is retried while online
    #[serde(default = "default_retry_interval", with = "duration_secs")]
    pub retry_interval: Duration,
    /// How often host loops probe connectivity
    #[serde(default = "default_probe_interval", with = "duration_secs")]
    pub probe_interval: Duration,
    /// Ask the remote store to ignore rows whose `client_sale_id` already exists
    #[serde(default)]
    pub idempotent_inserts: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            remote_timeout: default_remote_timeout(),
            retry_interval: default_retry_interval(),
            probe_interval: default_probe_interval(),
            idempotent_inserts: false,
        }
    }
}

impl SyncSettings {
    /// Every duration must be non-zero; timers cannot tick on a zero period.
    pub fn validate(&self) -> crate::Result<()> {
        let durations = [
            ("remote_timeout", self.remote_timeout),
            ("retry_interval", self.retry_interval),
            ("probe_interval", self.probe_interval),
        ];
        match durations.iter().find(|(_, value)| value.is_zero()) {
            Some((name, _)) => Err(crate::Error::Config(format!(
                "sync.{name} must be at least 1 second"
            ))),
            None => Ok(()),
        }
    }
}

const fn default_remote_timeout() -> Duration {
    Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS)
}

const fn default_retry_interval() -> Duration {
    Duration::from_secs(DEFAULT_RETRY_INTERVAL_SECS)
}

const fn default_probe_interval() -> Duration {
    Duration::from_secs(DEFAULT_PROBE_INTERVAL_SECS)
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supabase_config_trims_trailing_slash() {
        let config = SupabaseConfig::new(" https://project.supabase.co/ ", "anon").unwrap();
        assert_eq!(config.url, "https://project.supabase.co");
        assert_eq!(config.rest_url(), "https://project.supabase.co/rest/v1");
    }

    #[test]
    fn supabase_config_rejects_invalid_values() {
        assert!(SupabaseConfig::new("", "anon").is_err());
        assert!(SupabaseConfig::new("project.supabase.co", "anon").is_err());
        assert!(SupabaseConfig::new("https://project.supabase.co", "  ").is_err());
    }

    #[test]
    fn supabase_config_debug_redacts_key() {
        let config = SupabaseConfig::new("https://project.supabase.co", "secret").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn sync_settings_fill_missing_fields_with_defaults() {
        let settings: SyncSettings =
            serde_json::from_str(r#"{"remote_timeout": 3, "idempotent_inserts": true}"#).unwrap();
        assert_eq!(settings.remote_timeout, Duration::from_secs(3));
        assert_eq!(settings.retry_interval, default_retry_interval());
        assert!(settings.idempotent_inserts);
    }

    #[test]
    fn sync_settings_reject_zero_durations() {
        assert_eq!(SyncSettings::default().validate(), Ok(()));

        let settings: SyncSettings = serde_json::from_str(r#"{"retry_interval": 0}"#).unwrap();
        assert_eq!(
            settings.validate(),
            Err(crate::Error::Config(
                "sync.retry_interval must be at least 1 second".to_string()
            ))
        );

        let settings = SyncSettings {
            probe_interval: Duration::ZERO,
            ..SyncSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
