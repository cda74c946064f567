//! Application settings
//!
//! Settings load once at startup: defaults, then `Settings.toml` if present,
//! then environment variable overrides. The relying-party allow-list is part
//! of this configuration and is read-only for the life of the process.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

const SETTINGS_FILE: &str = "Settings.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PassgateSettings {
    pub application: ApplicationSettings,
    pub relying_party: RelyingPartySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: String,
}

/// Relying-party configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelyingPartySettings {
    /// Relying-party ids requests may target; anything else is rejected
    pub allowed_rp_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for RelyingPartySettings {
    fn default() -> Self {
        Self {
            allowed_rp_ids: vec!["localhost".to_string()],
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl PassgateSettings {
    /// Load settings and initialize logging
    ///
    /// # Errors
    ///
    /// Returns an error if `Settings.toml` exists but cannot be read or
    /// parsed.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);
        Self::initialize_logging(&settings);
        Ok(settings)
    }

    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        if Path::new(SETTINGS_FILE).exists() {
            let contents = fs::read_to_string(SETTINGS_FILE)?;
            Ok(basic_toml::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides on top of file/default settings
    pub fn apply_env_overrides(settings: &mut Self) {
        if let Ok(host) = env::var("PASSGATE_HOST") {
            settings.application.host = host;
        }
        if let Ok(port) = env::var("PASSGATE_PORT") {
            if let Ok(port) = port.parse() {
                settings.application.port = port;
            }
        }
        if let Ok(origins) = env::var("CORS_ORIGINS") {
            settings.application.cors_origins = origins;
        }
        if let Ok(rp_ids) = env::var("ALLOWED_RP_IDS") {
            let parsed = Self::parse_list(&rp_ids);
            if !parsed.is_empty() {
                settings.relying_party.allowed_rp_ids = parsed;
            }
        }
        if let Ok(level) = env::var("PASSGATE_LOG_LEVEL") {
            settings.logging.level = level;
        }
    }

    fn initialize_logging(settings: &Self) {
        let level = settings
            .logging
            .level
            .parse()
            .unwrap_or(log::LevelFilter::Info);
        // try_init so embedding in tests (which may init their own logger)
        // does not panic
        let _ = env_logger::Builder::new().filter_level(level).try_init();
    }

    fn parse_list(raw: &str) -> Vec<String> {
        // Preserve order, drop duplicates and empty entries
        let mut seen = HashSet::new();
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter(|entry| seen.insert(entry.to_string()))
            .map(ToString::to_string)
            .collect()
    }

    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }

    #[must_use]
    pub fn get_cors_origins(&self) -> Vec<String> {
        Self::parse_list(&self.application.cors_origins)
    }
}
