//! Exception extraction from staged log files.

use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::outcome::ScanOutcome;

/// A fully qualified class name ending in `Exception` or `Error`: one or more
/// dot-separated identifier segments plus the suffix.
const EXCEPTION_PATTERN: &str = r"[A-Za-z0-9.]+\.[0-9A-Za-z]+(?:Exception|Error)";

/// Log lines that match the exception pattern but do not signal a failure.
/// The struts message-key save line is the one confirmed offender.
pub const DEFAULT_SUPPRESSED_MARKERS: &[&str] = &["Saving message key '.errors"];

/// Pulls exception class names out of staged log files.
#[derive(Debug, Clone)]
pub struct ExceptionExtractor {
    pattern: Regex,
    suppressed: Vec<String>,
}

impl ExceptionExtractor {
    pub fn new(suppressed: Vec<String>) -> Self {
        let pattern = Regex::new(EXCEPTION_PATTERN).expect("exception pattern compiles");
        Self {
            pattern,
            suppressed,
        }
    }

    /// First exception token on a line, if the line introduces one.
    ///
    /// Continuation lines (stack frames) start with a tab and never introduce
    /// a new exception, so they are skipped outright. A line carrying a
    /// suppressed marker yields nothing even when it matches the pattern.
    pub fn first_match<'l>(&self, line: &'l str) -> Option<&'l str> {
        if line.starts_with('\t') {
            return None;
        }
        let found = self.pattern.find(line)?;
        if self
            .suppressed
            .iter()
            .any(|marker| line.contains(marker.as_str()))
        {
            return None;
        }
        Some(found.as_str())
    }

    /// Scan one staged file, feeding occurrences and problems into `outcome`.
    ///
    /// The logs-scanned counter reflects files opened, so it moves exactly
    /// once per readable file even when no exception is found. Open and
    /// mid-file read failures become problem entries for the file; whatever
    /// was read before the failure still counts.
    pub fn scan_file(&self, path: &Path, outcome: &ScanOutcome) {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                outcome.record_problem(
                    path.display().to_string(),
                    format!("Problem reading file: {err}"),
                );
                return;
            }
        };
        outcome.increment_logs_scanned();

        for line in BufReader::new(file).lines() {
            match line {
                Ok(line) => {
                    if let Some(name) = self.first_match(&line) {
                        outcome.record_exception(name);
                    }
                }
                Err(err) => {
                    outcome.record_problem(
                        path.display().to_string(),
                        format!("Problem reading file: {err}"),
                    );
                    break;
                }
            }
        }
    }
}

impl Default for ExceptionExtractor {
    fn default() -> Self {
        Self::new(
            DEFAULT_SUPPRESSED_MARKERS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
        )
    }
}
