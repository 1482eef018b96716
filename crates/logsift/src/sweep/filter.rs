//! Log file selection within one remote directory.

use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Selects the log files inside a remote directory that belong to a sweep.
///
/// Matching is non-recursive: only direct children of the directory are
/// considered, never anything in subdirectories. A file qualifies when its
/// name starts with one of the configured prefixes and either carries the
/// requested date token or, when sweeping the current day, looks like the
/// live log. Rotated logs carry the rotation marker plus an index suffix in
/// their name; the live log does not.
#[derive(Debug, Clone)]
pub struct LogFileFilter<'a> {
    prefixes: &'a [String],
    date_token: String,
    current_day: bool,
    rotation_marker: char,
}

impl<'a> LogFileFilter<'a> {
    pub fn new(
        prefixes: &'a [String],
        date_token: impl Into<String>,
        current_day: bool,
        rotation_marker: char,
    ) -> Self {
        Self {
            prefixes,
            date_token: date_token.into(),
            current_day,
            rotation_marker,
        }
    }

    /// Whether a file with this name belongs to the sweep.
    pub fn matches(&self, file_name: &str) -> bool {
        if !self.prefixes.iter().any(|p| file_name.starts_with(p.as_str())) {
            return false;
        }
        if file_name.contains(&self.date_token) {
            return true;
        }
        self.current_day && !file_name.contains(self.rotation_marker)
    }

    /// List matching files directly under `dir`, in name order.
    pub fn select(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut selected = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if self.matches(name) {
                    selected.push(entry.into_path());
                }
            }
        }
        selected.sort();
        Ok(selected)
    }
}
