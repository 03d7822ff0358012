#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SupportError};
use crate::utils::validation::{self, Validate};
use std::time::Duration;
use toml_config::ClientConfig;

#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_TOKEN_PATH: &str = ".dern/session.token";

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub token_path: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub json_logs: bool,
}

/// Effective client settings after merging overrides, the TOML file and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub timeout_seconds: u64,
    pub token_path: String,
    pub log_level: Option<String>,
    pub json_logs: bool,
}

impl Settings {
    pub fn resolve(file: Option<&ClientConfig>, overrides: Overrides) -> Result<Self> {
        let file_base_url = file.and_then(|f| f.base_url()).map(str::to_string);
        let api_base_url = overrides
            .api_url
            .or(file_base_url)
            .ok_or_else(|| SupportError::MissingConfig {
                field: "api.base_url (--api-url / DERN_API_URL)".to_string(),
            })?;

        let settings = Self {
            api_base_url,
            timeout_seconds: overrides
                .timeout_seconds
                .or_else(|| file.and_then(|f| f.timeout_seconds()))
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            token_path: overrides
                .token_path
                .or_else(|| file.and_then(|f| f.token_path()).map(str::to_string))
                .unwrap_or_else(|| DEFAULT_TOKEN_PATH.to_string()),
            log_level: file.and_then(|f| f.log_level()).map(str::to_string),
            json_logs: overrides.json_logs || file.is_some_and(|f| f.json_logs()),
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api_base_url)?;
        validation::validate_positive_number("api.timeout_seconds", self.timeout_seconds, 1)?;
        validation::validate_path("session.token_path", &self.token_path)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn token_path(&self) -> &str {
        &self.token_path
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "dern-support")]
#[command(about = "Command-line client for the Dern Support ticketing API")]
pub struct CliConfig {
    /// Base URL of the support API
    #[arg(long, env = "DERN_API_URL")]
    pub api_url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Where the session token is kept between runs
    #[arg(long, env = "DERN_SESSION_FILE")]
    pub session_file: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: cli::Command,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn settings(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => {
                let file = ClientConfig::from_file(path)?;
                file.validate()?;
                Some(file)
            }
            None => None,
        };

        Settings::resolve(
            file.as_ref(),
            Overrides {
                api_url: self.api_url.clone(),
                token_path: self.session_file.clone(),
                timeout_seconds: self.timeout_seconds,
                json_logs: self.json_logs,
            },
        )
    }
}
