//! Run command - execute one sweep and write the reports.

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use logsift::config::{self, SweepConfig};
use logsift::report;
use logsift::sweep::{run_sweep, ScanDate, SweepContext};

/// Arguments for the run command
#[derive(Debug, clap::Args)]
pub struct RunArgs {
    /// Environment whose targets should be scanned
    #[arg(default_value = "production")]
    pub environment: String,

    /// Date of the logs to scan: YYYY-MM-DD, or "yesterday" (default: today)
    #[arg(long)]
    pub date: Option<String>,

    /// Path to the sweep configuration file
    #[arg(long, env = "LOGSIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Staging directory override (default: ~/.logsift/work)
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Report directory override (default: ~/.logsift/reports)
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Leave staged log copies in place after the run
    #[arg(long)]
    pub keep_workspace: bool,
}

/// Execute the run command.
pub fn run(args: RunArgs) -> Result<()> {
    let config_path = args.config.unwrap_or_else(config::default_config_path);
    let config = SweepConfig::load(&config_path)?;

    let today = Local::now().date_naive();
    let date = resolve_scan_date(args.date.as_deref(), today)?;
    let scan_date = ScanDate::new(date, today);

    let targets = config.targets_for(&args.environment);
    if targets.is_empty() {
        warn!(
            environment = %args.environment,
            config = %config_path.display(),
            "no targets configured for this environment"
        );
    }

    let work_dir = args.work_dir.unwrap_or_else(config::work_dir);
    let report_dir = args.report_dir.unwrap_or_else(config::reports_dir);

    // Start from an empty staging area; leftovers from an aborted run would
    // otherwise be scanned as if they were today's logs.
    clear_workspace(&work_dir)?;

    info!(
        environment = %args.environment,
        date = %date,
        targets = targets.len(),
        work_dir = %work_dir.display(),
        "starting sweep"
    );

    let ctx = SweepContext::new(
        config.access_classes.clone(),
        scan_date,
        work_dir.clone(),
        &config.settings,
    );
    let summary = run_sweep(&ctx, &targets);

    println!("{}", report::summary_table(&summary.outcomes));
    println!(
        "{} logs scanned across {} targets",
        summary.logs_scanned,
        summary.outcomes.len()
    );

    let paths = report::write_csv_reports(&report_dir, &args.environment, date, &summary.outcomes)
        .context("failed to write CSV reports")?;
    println!("Counts report:   {}", paths.counts.display());
    println!("Problems report: {}", paths.problems.display());

    if args.keep_workspace {
        println!("Staged logs kept in {}", work_dir.display());
    } else {
        clear_workspace(&work_dir)?;
    }

    Ok(())
}

fn resolve_scan_date(arg: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match arg {
        None => Ok(today),
        Some("yesterday") => Ok(today.pred_opt().unwrap_or(today)),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| anyhow!("invalid date '{raw}': expected YYYY-MM-DD or 'yesterday'")),
    }
}

fn clear_workspace(work_dir: &Path) -> Result<()> {
    if work_dir.exists() {
        fs::remove_dir_all(work_dir)
            .with_context(|| format!("failed to clear workspace {}", work_dir.display()))?;
    }
    fs::create_dir_all(work_dir)
        .with_context(|| format!("failed to create workspace {}", work_dir.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_defaults_to_today() {
        let today = date(2024, 1, 5);
        assert_eq!(resolve_scan_date(None, today).unwrap(), today);
    }

    #[test]
    fn yesterday_is_relative_to_today() {
        let today = date(2024, 1, 5);
        assert_eq!(
            resolve_scan_date(Some("yesterday"), today).unwrap(),
            date(2024, 1, 4)
        );
    }

    #[test]
    fn explicit_date_is_parsed() {
        let today = date(2024, 1, 5);
        assert_eq!(
            resolve_scan_date(Some("2023-12-31"), today).unwrap(),
            date(2023, 12, 31)
        );
        assert!(resolve_scan_date(Some("12/31/2023"), today).is_err());
    }
}
