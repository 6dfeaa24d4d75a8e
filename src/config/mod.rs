//! Configuration module for the check-in tracker.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

use crate::errors::AppError;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite file backing the local key-value store
    pub db_path: PathBuf,
    /// Key the attendance snapshot is stored under
    pub storage_key: String,
    /// Advisory attendance capacity
    pub capacity: u32,
    /// Celebrate every Nth check-in
    pub milestone_every: u32,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log line format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("CHECKIN_DB_PATH")
            .unwrap_or_else(|_| "./data/checkin.sqlite".to_string())
            .into();

        let storage_key =
            env::var("CHECKIN_STORAGE_KEY").unwrap_or_else(|_| "attendanceData".to_string());

        let capacity = match env::var("CHECKIN_CAPACITY") {
            Ok(raw) => parse_positive("CHECKIN_CAPACITY", &raw)?,
            Err(_) => 50,
        };

        let milestone_every = match env::var("CHECKIN_MILESTONE_EVERY") {
            Ok(raw) => parse_positive("CHECKIN_MILESTONE_EVERY", &raw)?,
            Err(_) => 10,
        };

        let log_level = env::var("CHECKIN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var("CHECKIN_LOG_FORMAT") {
            Ok(raw) => parse_log_format(&raw)?,
            Err(_) => LogFormat::Pretty,
        };

        Ok(Self {
            db_path,
            storage_key,
            capacity,
            milestone_every,
            log_level,
            log_format,
        })
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<u32, AppError> {
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(AppError::Config(format!(
            "{} must be a positive integer, got {:?}",
            name, raw
        ))),
    }
}

fn parse_log_format(raw: &str) -> Result<LogFormat, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "text" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(AppError::Config(format!(
            "CHECKIN_LOG_FORMAT must be 'pretty' or 'json', got {:?}",
            other
        ))),
    }
}
