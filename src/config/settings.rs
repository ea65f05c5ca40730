use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, File};
use std::path::Path;

use crate::backend::BackendConfig;
use crate::leaderboard::{CategorizationScheme, DEFAULT_EXPORT_FILE};

pub const ENV_PREFIX: &str = "CLUB_LEADERBOARD";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub backend: BackendSettings,
    pub leaderboard: LeaderboardSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
    pub log_level: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    pub base_url: String,
    /// Bearer credential sent with every request
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardSettings {
    pub scheme: CategorizationScheme,
    /// Entries shown on the podium of each bucket
    pub top_n: usize,
    pub export_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: "Club Leaderboard".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                log_level: "info".to_string(),
                environment: Environment::Development,
            },
            backend: BackendSettings {
                base_url: "http://localhost:5001".to_string(),
                api_key: None,
                timeout_seconds: 30,
            },
            leaderboard: LeaderboardSettings {
                scheme: CategorizationScheme::ByYearAndStar,
                top_n: 3,
                export_file: DEFAULT_EXPORT_FILE.to_string(),
            },
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Defaults, then `config/default` and `config/local`, then `extra`,
    /// then `CLUB_LEADERBOARD__SECTION__KEY` environment variables.
    pub fn load(extra: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(path.as_ref()))
            .build()?;

        s.try_deserialize()
    }

    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.backend.base_url.clone(),
            timeout_seconds: self.backend.timeout_seconds,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.backend.base_url.trim().is_empty() {
            return Err("Backend base URL must not be empty".to_string());
        }

        if self.backend.timeout_seconds == 0 {
            return Err("Backend timeout must be at least one second".to_string());
        }

        if self.leaderboard.top_n == 0 {
            return Err("Leaderboard top_n must be at least 1".to_string());
        }

        if self.leaderboard.export_file.trim().is_empty() {
            return Err("Export file name must not be empty".to_string());
        }

        Ok(())
    }
}
