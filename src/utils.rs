//! Small helpers shared by the commands.
//!
//! - String truncation for log and error previews
//! - Output location validation, run before any network work
//! - Human-readable durations for the final summary

use crate::error::AppError;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure `path` can be opened for writing before any work is done.
///
/// Creates missing parent directories, then opens the target itself for
/// writing without truncating it. A target that did not exist before is
/// removed again, so a failed run leaves any previous output in place.
///
/// # Errors
///
/// Returns [`AppError::NotWritable`] if the target is a directory, or if it
/// or its parent cannot be created or opened for writing.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn ensure_writable_output(path: &Path) -> Result<(), AppError> {
    let not_writable = |source: io::Error| AppError::NotWritable {
        path: path.to_path_buf(),
        source,
    };

    if path.is_dir() {
        return Err(not_writable(io::Error::other("path is a directory")));
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(not_writable)?;

    let existed = path.exists();
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(not_writable)?;
    if !existed {
        let _ = fs::remove_file(path);
    }
    info!("Output location is writable");
    Ok(())
}

/// Format a duration as `12.3s`, `4m 5s` or `1h 2m 3s`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
