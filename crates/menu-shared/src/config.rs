//! Configuration management
//!
//! Loaded once at startup and shared read-only for the lifetime of the process.

use std::path::PathBuf;

use chrono_tz::Tz;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants;
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub media: MediaSettings,
    pub email: EmailSettings,
    pub report: ReportSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    /// IANA zone used to render timestamps and to interpret date filters.
    pub time_zone: String,
    pub log_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MediaSettings {
    pub root: String,
    pub max_upload_size: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmailBackend {
    Smtp,
    Console,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailSettings {
    pub backend: EmailBackend,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub use_tls: bool,
    pub use_ssl: bool,
    pub from: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportSettings {
    pub enabled: bool,
    /// Six-field cron expression (seconds first), evaluated in the configured time zone.
    pub schedule: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config: Self = Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.time_zone()?;
        Ok(config)
    }

    /// Builder pre-populated with every default so that only secrets need to be supplied.
    pub fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "menu-server")?
            .set_default("app.time_zone", constants::DEFAULT_TIME_ZONE)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.run_migrations", true)?
            .set_default("media.root", constants::DEFAULT_MEDIA_ROOT)?
            .set_default("media.max_upload_size", constants::DEFAULT_MAX_UPLOAD_SIZE)?
            .set_default("email.backend", "smtp")?
            .set_default("email.host", "smtp.example.com")?
            .set_default("email.port", 587)?
            .set_default("email.username", "")?
            .set_default("email.password", "")?
            .set_default("email.use_tls", true)?
            .set_default("email.use_ssl", false)?
            .set_default("email.from", "your_email@example.com")?
            .set_default("report.enabled", true)?
            .set_default("report.schedule", constants::DEFAULT_REPORT_SCHEDULE)
    }

    pub fn time_zone(&self) -> Result<Tz, AppError> {
        self.app
            .time_zone
            .parse::<Tz>()
            .map_err(|_| AppError::InvalidTimeZone(self.app.time_zone.clone()))
    }

    pub fn media_root(&self) -> PathBuf {
        PathBuf::from(&self.media.root)
    }
}
