//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::path::PathBuf;

use crate::progress::ProgressPlan;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Input limits
    pub input: InputSettings,
    /// Progress milestones and ticker pacing
    pub progress: ProgressPlan,
    /// Log output
    pub logging: LoggingSettings,
}

/// `[input]` section.
#[derive(Debug, Clone)]
pub struct InputSettings {
    /// Largest save accepted, in bytes.
    pub max_file_size: u64,
    /// Timeout in seconds for remote save downloads.
    pub remote_timeout_secs: u64,
}

/// `[logging]` section.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}
