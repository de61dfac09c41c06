//! Settings for the application.
//!
//! Read from a TOML file (`settings.toml` unless `--config` says otherwise),
//! then overridden by `LEDGERLY__<SECTION>__<KEY>` environment variables and
//! finally by command line flags.

use std::time::Duration;

use chrono_tz::Tz;
use clap::Parser;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

use crate::error::AppError;

const DEFAULT_CONFIG_PATH: &str = "settings.toml";

#[derive(Debug, Parser)]
#[command(name = "ledgerly", about = "Personal finance backend")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the listening port.
    #[arg(long)]
    port: Option<u16>,
    /// Override the log level (e.g. `debug`).
    #[arg(long)]
    level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
    /// IANA zone deciding what "this month" is.
    pub timezone: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

impl App {
    pub fn timezone(&self) -> Result<Tz, AppError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::Setting(format!("unknown timezone '{}'", self.timezone)))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Database {
    /// A sea-orm connection string, or `memory`.
    pub url: String,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            url: "sqlite:./ledgerly.db?mode=rwc".to_string(),
        }
    }
}

impl Database {
    pub fn connection_url(&self) -> String {
        match self.url.as_str() {
            "memory" => "sqlite::memory:".to_string(),
            url => url.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Auth {
    /// Base url of the auth provider.
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_auth_timeout")]
    pub timeout_secs: u64,
}

fn default_auth_timeout() -> u64 {
    10
}

impl Auth {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Advisor {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    /// History turns sent with each chat message.
    pub history_limit: u64,
}

impl Default for Advisor {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
            history_limit: 20,
        }
    }
}

impl Advisor {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub database: Database,
    pub auth: Auth,
    #[serde(default)]
    pub advisor: Advisor,
}

impl Settings {
    /// Loads settings from file, environment and command line.
    pub fn load() -> Result<Self, AppError> {
        let args = Args::parse();

        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let builder =
            Config::builder().add_source(File::with_name(config_path).required(false));
        let mut settings = Self::build(builder)?;

        if let Some(port) = args.port {
            settings.server.port = port;
        }
        if let Some(level) = args.level {
            settings.app.level = level;
        }

        Ok(settings)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        let settings = builder
            .add_source(
                Environment::with_prefix("LEDGERLY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
