//! The scan task for a single target.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::thread;
use tracing::{debug, info};

use super::filter::LogFileFilter;
use super::outcome::ScanOutcome;
use super::resolve::resolve_paths;
use super::run::SweepContext;
use super::stage::local_destination;
use super::types::ScanTarget;

/// Scan one target: resolve its directories, stage that day's log files into
/// the local work area, and extract exception names from the staged copies.
///
/// Everything that goes wrong below the target level (missing directory,
/// empty match, copy or read failure) is recorded as a problem on the
/// returned outcome; this function itself does not fail.
pub fn scan_target(ctx: &SweepContext, target: &ScanTarget) -> ScanOutcome {
    let outcome = ScanOutcome::new(target);
    let token = ctx.date.token_for(&target.kind);
    let filter = LogFileFilter::new(
        &target.prefixes,
        token,
        ctx.date.current_day,
        ctx.rotation_marker,
    );

    let mut remote_files: Vec<PathBuf> = Vec::new();
    for dir in resolve_paths(target, &ctx.access) {
        let dir_path = Path::new(&dir);
        if !dir_path.exists() {
            outcome.record_problem(dir.as_str(), "Directory does not exist.");
            continue;
        }
        match filter.select(dir_path) {
            Ok(files) if files.is_empty() => {
                outcome.record_problem(
                    dir.as_str(),
                    format!(
                        "No logs found per search criteria. prefixes={:?}",
                        target.prefixes
                    ),
                );
            }
            Ok(mut files) => remote_files.append(&mut files),
            Err(err) => {
                outcome.record_problem(dir.as_str(), format!("Directory listing failed: {err}"));
            }
        }
    }

    info!(
        target = %target.name,
        files = remote_files.len(),
        "staging log files"
    );

    // Stage the selected files with unordered parallelism. A failed copy
    // taints only its own file; the siblings keep going.
    let staged: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());
    let outcome_ref = &outcome;
    let staged_ref = &staged;
    thread::scope(|scope| {
        for source in &remote_files {
            let dest = local_destination(&ctx.work_dir, target, source);
            scope.spawn(move || {
                debug!(source = %source.display(), dest = %dest.display(), "copying log file");
                match ctx.stager.stage(source, &dest) {
                    Ok(_) => staged_ref
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(dest),
                    Err(err) => outcome_ref.record_problem(
                        source.display().to_string(),
                        format!("Error copying log file: {err}"),
                    ),
                }
            });
        }
    });

    let mut staged = staged.into_inner().unwrap_or_else(PoisonError::into_inner);
    staged.sort();
    for local in &staged {
        ctx.extractor.scan_file(local, &outcome);
    }

    outcome
}
