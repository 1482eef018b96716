//! Per-target result accumulation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use super::types::{Problem, ScanTarget, TargetKind};

/// Accumulated results for one scan target.
///
/// The staging fan-out for a single target mutates its outcome from several
/// threads at once, so every mutating operation synchronizes internally. Each
/// task owns exactly one outcome and nothing is shared across targets, which
/// keeps the locks uncontended outside the owning task.
#[derive(Debug)]
pub struct ScanOutcome {
    target_name: String,
    target_kind: TargetKind,
    logs_scanned: AtomicU64,
    exceptions: Mutex<ExceptionTally>,
    problems: Mutex<Vec<Problem>>,
}

#[derive(Debug, Default)]
struct ExceptionTally {
    counts: BTreeMap<String, u64>,
    total: u64,
}

impl ScanOutcome {
    pub fn new(target: &ScanTarget) -> Self {
        Self {
            target_name: target.name.clone(),
            target_kind: target.kind.clone(),
            logs_scanned: AtomicU64::new(0),
            exceptions: Mutex::new(ExceptionTally::default()),
            problems: Mutex::new(Vec::new()),
        }
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn target_kind(&self) -> &TargetKind {
        &self.target_kind
    }

    /// Count one occurrence of an exception class name.
    pub fn record_exception(&self, name: &str) {
        let mut tally = self
            .exceptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *tally.counts.entry(name.to_string()).or_insert(0) += 1;
        tally.total += 1;
    }

    /// Append a non-fatal diagnostic for a directory or file.
    pub fn record_problem(&self, subject: impl Into<String>, message: impl Into<String>) {
        self.problems
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Problem::new(subject, message));
    }

    /// Count one log file opened for reading.
    pub fn increment_logs_scanned(&self) {
        self.logs_scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn logs_scanned(&self) -> u64 {
        self.logs_scanned.load(Ordering::Relaxed)
    }

    pub fn total_exceptions(&self) -> u64 {
        self.exceptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .total
    }

    /// Snapshot of the per-exception counts, keyed by class name.
    pub fn exception_counts(&self) -> BTreeMap<String, u64> {
        self.exceptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .counts
            .clone()
    }

    /// Snapshot of the recorded problems, in insertion order.
    pub fn problems(&self) -> Vec<Problem> {
        self.problems
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn target() -> ScanTarget {
        ScanTarget {
            name: "Widget".into(),
            environment: "production".into(),
            kind: TargetKind::App("webapp".into()),
            access: "Private".into(),
            paths: vec![],
            prefixes: vec![],
            stage_layout: None,
        }
    }

    #[test]
    fn counts_distinct_exceptions_separately() {
        let outcome = ScanOutcome::new(&target());
        outcome.record_exception("com.foo.AException");
        outcome.record_exception("com.foo.AException");
        outcome.record_exception("com.foo.BError");

        let counts = outcome.exception_counts();
        assert_eq!(counts["com.foo.AException"], 2);
        assert_eq!(counts["com.foo.BError"], 1);
        assert_eq!(outcome.total_exceptions(), 3);
    }

    #[test]
    fn concurrent_increments_do_not_lose_updates() {
        let outcome = ScanOutcome::new(&target());
        thread::scope(|scope| {
            for _ in 0..50 {
                scope.spawn(|| {
                    outcome.record_exception("com.foo.SharedException");
                    outcome.increment_logs_scanned();
                });
            }
        });
        assert_eq!(outcome.exception_counts()["com.foo.SharedException"], 50);
        assert_eq!(outcome.total_exceptions(), 50);
        assert_eq!(outcome.logs_scanned(), 50);
    }

    #[test]
    fn concurrent_problem_appends_all_survive() {
        let outcome = ScanOutcome::new(&target());
        let shared = &outcome;
        thread::scope(|scope| {
            for i in 0..50 {
                scope.spawn(move || {
                    shared.record_problem(format!("/dir/{i}"), "Directory does not exist.");
                });
            }
        });
        assert_eq!(outcome.problems().len(), 50);
    }
}
