//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::num::NonZeroU64;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use super::size::parse_size;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [input] section
    if let Some(section) = ini.section(Some("input")) {
        if let Some(v) = section.get("max_file_size") {
            config.input.max_file_size = parse_size(v)
                .ok()
                .filter(|&size| size > 0)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "input".to_string(),
                    key: "max_file_size".to_string(),
                    value: v.to_string(),
                    reason: "expected a non-zero size like '1GB', '500MB', or '1024KB'".to_string(),
                })?;
        }
        if let Some(v) = get_parsed::<NonZeroU64>(
            section,
            "input",
            "remote_timeout_secs",
            "must be a positive integer (seconds)",
        )? {
            config.input.remote_timeout_secs = v.get();
        }
    }

    // [progress] section
    if let Some(section) = ini.section(Some("progress")) {
        let plan = &mut config.progress;

        if let Some(ms) = get_parsed::<NonZeroU64>(
            section,
            "progress",
            "tick_interval_ms",
            "must be a positive integer (milliseconds)",
        )? {
            plan.tick_interval = Duration::from_millis(ms.get());
        }

        let percent_keys: [(&str, &mut f64); 9] = [
            ("tick_step", &mut plan.tick_step),
            ("bytes_read", &mut plan.bytes_read),
            ("type_detected", &mut plan.type_detected),
            ("parse_start", &mut plan.parse_start),
            ("parse_end", &mut plan.parse_end),
            ("fetch_slice", &mut plan.fetch_slice),
            ("coarse_pass", &mut plan.coarse_pass),
            ("full_pass_slice", &mut plan.full_pass_slice),
            ("render_slice", &mut plan.render_slice),
        ];
        for (key, field) in percent_keys {
            if let Some(v) = get_parsed::<f64>(section, "progress", key, "must be a number")? {
                *field = v;
            }
        }

        if let Err(reason) = config.progress.validate() {
            return Err(ConfigFileError::InvalidValue {
                section: "progress".to_string(),
                key: "*".to_string(),
                value: String::new(),
                reason,
            });
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

/// Parse `key` from `section` if present.
fn get_parsed<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigFileError> {
    match section.get(key) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigFileError::InvalidValue {
                section: section_name.to_string(),
                key: key.to_string(),
                value: v.to_string(),
                reason: reason.to_string(),
            }),
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
