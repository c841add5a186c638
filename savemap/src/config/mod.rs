//! Configuration loaded from `~/.savemap/config.ini`.
//!
//! ```ini
//! [input]
//! max_file_size = 1GB
//! remote_timeout_secs = 30
//!
//! [progress]
//! tick_interval_ms = 33
//! tick_step = 3
//! parse_start = 20
//! parse_end = 45
//!
//! [logging]
//! directory = ~/.savemap/logs
//! file = savemap.log
//! ```
//!
//! Missing files and keys fall back to the built-in defaults.

mod defaults;
mod file;
mod parser;
mod settings;
mod size;

pub use defaults::{
    default_log_directory, DEFAULT_LOG_FILE, DEFAULT_MAX_FILE_SIZE, DEFAULT_REMOTE_TIMEOUT_SECS,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, InputSettings, LoggingSettings};
pub use size::{format_size, parse_size, SizeParseError};
