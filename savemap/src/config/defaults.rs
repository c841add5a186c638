//! Default values for all configuration settings.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::progress::ProgressPlan;

/// Largest save accepted by default (1 GB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Default remote download timeout.
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "savemap.log";

/// Default log directory (~/.savemap/logs).
pub fn default_log_directory() -> PathBuf {
    config_directory().join("logs")
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            input: InputSettings {
                max_file_size: DEFAULT_MAX_FILE_SIZE,
                remote_timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
            },
            progress: ProgressPlan::default(),
            logging: LoggingSettings {
                directory: default_log_directory(),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}
