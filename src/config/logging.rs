//! Logging configuration.

use serde::{Deserialize, Serialize};

use super::env::EnvSource;
use super::error::{require_positive_int, ConfigError, NON_NEGATIVE};

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Logging verbosity: "DEBUG", "INFO", "WARN", "ERROR".
    pub level: String,
    pub file_path: String,
    pub console_logging_enabled: bool,
    pub file_logging_enabled: bool,
    pub max_file_size_mb: i64,
    /// Number of rotated files to keep.
    pub max_backup_files: i64,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file_path: "./logs/bot.log".to_string(),
            console_logging_enabled: true,
            file_logging_enabled: true,
            max_file_size_mb: 10,
            max_backup_files: 5,
        }
    }
}

impl LoggingSettings {
    pub fn from_env(env: &impl EnvSource) -> Self {
        let d = Self::default();
        Self {
            level: env.string("LOG_LEVEL", &d.level),
            file_path: env.string("LOG_FILE_PATH", &d.file_path),
            console_logging_enabled: env.boolean(
                "LOG_CONSOLE_ENABLED",
                d.console_logging_enabled,
            ),
            file_logging_enabled: env.boolean("LOG_FILE_ENABLED", d.file_logging_enabled),
            max_file_size_mb: env.int("LOG_MAX_FILE_SIZE_MB", d.max_file_size_mb),
            max_backup_files: env.int("LOG_MAX_BACKUP_FILES", d.max_backup_files),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file_logging_enabled && self.file_path.is_empty() {
            return Err(ConfigError::Missing {
                field: "logging.file_path",
                reason: "log file path must be specified when file logging is enabled",
            });
        }
        require_positive_int("logging.max_file_size_mb", self.max_file_size_mb)?;
        if self.max_backup_files < 0 {
            return Err(ConfigError::out_of_range(
                "logging.max_backup_files",
                NON_NEGATIVE,
                self.max_backup_files,
            ));
        }
        Ok(())
    }

    /// Maps the configured level to a `tracing` filter directive.
    ///
    /// Unknown levels fall back to "info".
    pub fn filter_directive(&self) -> &'static str {
        match self.level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "warn" | "warning" => "warn",
            "error" => "error",
            _ => "info",
        }
    }
}
