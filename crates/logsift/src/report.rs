//! Report rendering for completed sweeps.
//!
//! Two CSV files per run (exception counts and problem entries) plus a
//! console summary table. File names carry the log date, the environment,
//! and a run timestamp so successive runs never clobber each other.

use chrono::{Local, NaiveDate};
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use std::fs;
use std::path::{Path, PathBuf};

use crate::sweep::ScanOutcome;

/// Locations of the files written by [`write_csv_reports`].
#[derive(Debug)]
pub struct ReportPaths {
    pub counts: PathBuf,
    pub problems: PathBuf,
}

/// Write the per-target exception counts and problem entries under `dir`.
pub fn write_csv_reports(
    dir: &Path,
    environment: &str,
    date: NaiveDate,
    outcomes: &[ScanOutcome],
) -> Result<ReportPaths, csv::Error> {
    fs::create_dir_all(dir)?;
    let stamp = Local::now().format("%Y%m%d%H%M%S");
    let prefix = format!("{}_{}", date.format("%Y%m%d"), environment);

    let counts_path = dir.join(format!("{prefix}_exception_counts_{stamp}.csv"));
    let mut counts = csv::Writer::from_path(&counts_path)?;
    counts.write_record(["target", "kind", "exception", "count"])?;
    for outcome in outcomes {
        for (exception, count) in outcome.exception_counts() {
            counts.write_record([
                outcome.target_name(),
                outcome.target_kind().as_str(),
                exception.as_str(),
                count.to_string().as_str(),
            ])?;
        }
    }
    counts.flush()?;

    let problems_path = dir.join(format!("{prefix}_problems_{stamp}.csv"));
    let mut problems = csv::Writer::from_path(&problems_path)?;
    problems.write_record(["target", "subject", "message"])?;
    for outcome in outcomes {
        for problem in outcome.problems() {
            problems.write_record([
                outcome.target_name(),
                problem.subject.as_str(),
                problem.message.as_str(),
            ])?;
        }
    }
    problems.flush()?;

    Ok(ReportPaths {
        counts: counts_path,
        problems: problems_path,
    })
}

/// Console summary of a sweep, one row per target.
pub fn summary_table(outcomes: &[ScanOutcome]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(["Target", "Kind", "Logs Scanned", "Exceptions", "Problems"]);

    for outcome in outcomes {
        table.add_row([
            outcome.target_name().to_string(),
            outcome.target_kind().to_string(),
            outcome.logs_scanned().to_string(),
            outcome.total_exceptions().to_string(),
            outcome.problems().len().to_string(),
        ]);
    }
    table
}
