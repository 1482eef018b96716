//! Sweep orchestration across all targets.

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;
use tracing::{error, info};

use crate::config::SweepSettings;

use super::extract::ExceptionExtractor;
use super::outcome::ScanOutcome;
use super::stage::Stager;
use super::task::scan_target;
use super::types::{AccessRegistry, ScanDate, ScanTarget};

/// Everything a sweep needs that is not the target list itself. Constructed
/// once per invocation and passed by reference to every component; there is
/// no process-wide instance.
#[derive(Debug)]
pub struct SweepContext {
    pub access: AccessRegistry,
    pub date: ScanDate,
    pub work_dir: PathBuf,
    pub rotation_marker: char,
    pub max_concurrent: usize,
    pub poll_interval: Duration,
    pub stager: Stager,
    pub extractor: ExceptionExtractor,
}

impl SweepContext {
    pub fn new(
        access: AccessRegistry,
        date: ScanDate,
        work_dir: PathBuf,
        settings: &SweepSettings,
    ) -> Self {
        Self {
            access,
            date,
            work_dir,
            rotation_marker: settings.rotation_marker,
            max_concurrent: settings.max_concurrent_targets,
            poll_interval: settings.poll_interval(),
            stager: Stager::new(settings.copy_attempts, settings.copy_retry_delay()),
            extractor: ExceptionExtractor::new(settings.suppressed_markers.clone()),
        }
    }
}

/// Totals for a completed sweep.
#[derive(Debug)]
pub struct SweepSummary {
    /// One outcome per submitted target, in submission order.
    pub outcomes: Vec<ScanOutcome>,
    /// Grand total of log files scanned across all targets.
    pub logs_scanned: u64,
}

/// Run one scan task per target on a bounded worker pool and collect every
/// outcome.
///
/// Workers pull target indices from a shared counter, so at most
/// `max_concurrent` targets are in flight. A separate observer thread reports
/// completion counts while the pool works; joining the worker handles is the
/// completion barrier. A task that panics still yields an outcome carrying
/// the failure as a problem entry, so one bad target never aborts the sweep.
pub fn run_sweep(ctx: &SweepContext, targets: &[ScanTarget]) -> SweepSummary {
    let total = targets.len();
    if total == 0 {
        return SweepSummary {
            outcomes: Vec::new(),
            logs_scanned: 0,
        };
    }

    let next = AtomicUsize::new(0);
    let completed = AtomicUsize::new(0);
    let outcomes: Mutex<Vec<Option<ScanOutcome>>> =
        Mutex::new((0..total).map(|_| None).collect());

    let workers = ctx.max_concurrent.max(1).min(total);
    info!(targets = total, workers, "starting sweep");

    thread::scope(|scope| {
        // The observer sleeps on this channel; the send after the pool join
        // wakes it immediately instead of waiting out a full interval.
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let completed_ref = &completed;
        let observer = scope.spawn(move || {
            let mut last = 0;
            loop {
                match stop_rx.recv_timeout(ctx.poll_interval) {
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        let done = completed_ref.load(Ordering::SeqCst);
                        if done != last {
                            info!(completed = done, submitted = total, "scan tasks completed");
                            last = done;
                        }
                    }
                }
            }
        });

        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let next_ref = &next;
            let outcomes_ref = &outcomes;
            handles.push(scope.spawn(move || loop {
                let index = next_ref.fetch_add(1, Ordering::SeqCst);
                if index >= total {
                    break;
                }
                let target = &targets[index];
                let outcome =
                    match panic::catch_unwind(AssertUnwindSafe(|| scan_target(ctx, target))) {
                        Ok(outcome) => outcome,
                        Err(_) => {
                            error!(target = %target.name, "scan task failed unexpectedly");
                            let outcome = ScanOutcome::new(target);
                            outcome.record_problem(
                                target.name.as_str(),
                                "Scan task failed unexpectedly; results for this target are incomplete.",
                            );
                            outcome
                        }
                    };
                outcomes_ref
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)[index] = Some(outcome);
                completed_ref.fetch_add(1, Ordering::SeqCst);
            }));
        }

        for handle in handles {
            let _ = handle.join();
        }
        let _ = stop_tx.send(());
        let _ = observer.join();
    });

    let outcomes: Vec<ScanOutcome> = outcomes
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
        .into_iter()
        .flatten()
        .collect();
    let logs_scanned = outcomes.iter().map(ScanOutcome::logs_scanned).sum();
    info!(targets = outcomes.len(), logs_scanned, "sweep complete");

    SweepSummary {
        outcomes,
        logs_scanned,
    }
}
