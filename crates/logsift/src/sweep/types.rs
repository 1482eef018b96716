//! Core types for the sweep pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of scan target.
///
/// Server targets name their log directories outright; application targets
/// carry paths relative to the host roots of their access class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetKind {
    /// A server cluster whose configured paths are absolute.
    Server,
    /// An application kind, e.g. `webapp` or `batch`.
    App(String),
}

impl TargetKind {
    pub fn is_server(&self) -> bool {
        matches!(self, TargetKind::Server)
    }

    pub fn as_str(&self) -> &str {
        match self {
            TargetKind::Server => "server",
            TargetKind::App(kind) => kind,
        }
    }
}

impl From<String> for TargetKind {
    fn from(raw: String) -> Self {
        if raw == "server" {
            TargetKind::Server
        } else {
            TargetKind::App(raw)
        }
    }
}

impl From<TargetKind> for String {
    fn from(kind: TargetKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where staged copies of a target's files land under the work directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageLayout {
    /// One subdirectory per source host, keyed by the remote file's parent
    /// directory name. Separates hosts that share a file naming scheme.
    PerHost,
    /// A single subdirectory named after the target.
    PerTarget,
}

/// One logical unit to scan: an application or a server cluster with its own
/// directories and log-name prefixes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanTarget {
    pub name: String,
    pub environment: String,
    pub kind: TargetKind,
    /// Access label expanded through the [`AccessRegistry`].
    pub access: String,
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub prefixes: Vec<String>,
    /// Optional override of the kind-derived staging layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_layout: Option<StageLayout>,
}

impl ScanTarget {
    /// Staging layout for this target. Server targets stage per source host
    /// unless overridden; everything else collapses under the target name.
    pub fn effective_stage_layout(&self) -> StageLayout {
        self.stage_layout.unwrap_or(if self.kind.is_server() {
            StageLayout::PerHost
        } else {
            StageLayout::PerTarget
        })
    }
}

/// Maps a symbolic access label to the host root paths registered for it.
///
/// Unrecognized labels resolve to an empty slice, which makes the affected
/// target yield empty results rather than failing the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessRegistry {
    classes: BTreeMap<String, Vec<String>>,
}

impl AccessRegistry {
    pub fn new(classes: BTreeMap<String, Vec<String>>) -> Self {
        Self { classes }
    }

    /// Host roots registered for `label`, in registration order.
    pub fn roots(&self, label: &str) -> &[String] {
        self.classes.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// The calendar date a sweep runs against, plus whether it is today.
///
/// Scanning the current day enables the active-log fallback in the directory
/// filter, since the live log has not been stamped with a date yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanDate {
    pub date: NaiveDate,
    pub current_day: bool,
}

impl ScanDate {
    pub fn new(date: NaiveDate, today: NaiveDate) -> Self {
        Self {
            date,
            current_day: date == today,
        }
    }

    /// Filename token for this date. Server logs carry a two-digit-year
    /// token; application logs embed the ISO date.
    pub fn token_for(&self, kind: &TargetKind) -> String {
        match kind {
            TargetKind::Server => self.date.format("%y.%m.%d").to_string(),
            TargetKind::App(_) => self.date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// A non-fatal diagnostic recorded against a directory or file during a
/// sweep, surfaced in the report instead of aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub subject: String,
    pub message: String,
}

impl Problem {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
        }
    }
}
