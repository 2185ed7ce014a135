//! Configuration module for ephemail.

use serde::Deserialize;
use std::path::Path;

use crate::{EphemailError, Result};

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/ephemail.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Outgoing SMTP relay configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// Hostname of the SMTP server that outgoing mail is relayed to.
    #[serde(default = "default_smtp_host")]
    pub host: String,
    /// Port of the outgoing SMTP server.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Username for the outgoing SMTP server.
    ///
    /// Accepted in the configuration but not used when opening the relay
    /// session; the relay currently connects unauthenticated.
    #[serde(default)]
    pub username: Option<String>,
    /// Password for the outgoing SMTP server.
    ///
    /// Accepted in the configuration but not used when opening the relay
    /// session; the relay currently connects unauthenticated.
    #[serde(default)]
    pub password: Option<String>,
    /// Connect/send timeout in seconds for one relay attempt.
    #[serde(default = "default_smtp_timeout")]
    pub timeout_secs: u64,
}

fn default_smtp_host() -> String {
    "127.0.0.1".to_string()
}

fn default_smtp_port() -> u16 {
    25
}

fn default_smtp_timeout() -> u64 {
    30
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: None,
            password: None,
            timeout_secs: default_smtp_timeout(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. When unset, logs go to the console only.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Outgoing SMTP relay configuration.
    #[serde(default)]
    pub smtp: SmtpConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(EphemailError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable
    /// overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| EphemailError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `EPHEMAIL_SMTP_HOST`: host of the outgoing SMTP server
    /// - `EPHEMAIL_SMTP_USERNAME`: username for the outgoing SMTP server
    /// - `EPHEMAIL_SMTP_PASSWORD`: password for the outgoing SMTP server
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("EPHEMAIL_SMTP_HOST") {
            if !host.is_empty() {
                self.smtp.host = host;
            }
        }
        if let Ok(username) = std::env::var("EPHEMAIL_SMTP_USERNAME") {
            if !username.is_empty() {
                self.smtp.username = Some(username);
            }
        }
        if let Ok(password) = std::env::var("EPHEMAIL_SMTP_PASSWORD") {
            if !password.is_empty() {
                self.smtp.password = Some(password);
            }
        }
    }
}
