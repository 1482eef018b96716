//! End-to-end sweep over a synthetic fleet.
//!
//! Builds a fake remote share with three targets in different states (one
//! healthy, one unreachable, one with nothing to find) and checks that the
//! orchestrator degrades per target instead of failing the run.

use chrono::NaiveDate;
use logsift::config::SweepSettings;
use logsift::sweep::{
    run_sweep, AccessRegistry, ScanDate, ScanTarget, StageLayout, SweepContext, TargetKind,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn app_target(name: &str, access: &str, path: &str, prefix: &str) -> ScanTarget {
    ScanTarget {
        name: name.into(),
        environment: "production".into(),
        kind: TargetKind::App("webapp".into()),
        access: access.into(),
        paths: vec![path.into()],
        prefixes: vec![prefix.into()],
        stage_layout: None,
    }
}

fn write_log(dir: &Path, name: &str, contents: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn sweep_degrades_per_target_and_totals_scanned_logs() {
    let remote = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();

    // Healthy target: two hosts, one dated log each, one distinct exception.
    // Log names carry the node they came from, as rotated fleet logs do.
    write_log(
        &remote.path().join("hostA").join("apps").join("widget").join("logs"),
        "App.widget-a1.log.2024-01-05_1.log",
        "com.foo.custom.WidgetNotFoundException: missing id\n\
         \tat com.foo.Widget.load(Widget.java:5)\n\
         INFO request handled\n",
    );
    write_log(
        &remote.path().join("hostB").join("apps").join("widget").join("logs"),
        "App.widget-b1.log.2024-01-05_1.log",
        "INFO warming caches\n\
         com.foo.cache.CacheOverflowError: evicting\n",
    );

    // Quiet target: the directory exists but holds nothing matching.
    write_log(
        &remote.path().join("hostA").join("apps").join("quiet").join("logs"),
        "Other.quiet.log.2024-01-05_1.log",
        "nothing to see\n",
    );
    fs::create_dir_all(
        remote.path().join("hostB").join("apps").join("quiet").join("logs"),
    )
    .unwrap();

    let mut classes = BTreeMap::new();
    classes.insert(
        "Private".to_string(),
        vec![
            remote.path().join("hostA").display().to_string(),
            remote.path().join("hostB").display().to_string(),
        ],
    );

    let targets = vec![
        app_target("WidgetStore", "Private", "/apps/widget/logs", "App."),
        app_target("GhostApp", "Private", "/apps/ghost/logs", "App."),
        app_target("QuietApp", "Private", "/apps/quiet/logs", "App."),
    ];

    let mut settings = SweepSettings::default();
    settings.copy_retry_delay_secs = 0;
    settings.poll_interval_secs = 1;

    let ctx = SweepContext::new(
        AccessRegistry::new(classes),
        ScanDate::new(date(2024, 1, 5), date(2024, 1, 6)),
        work.path().to_path_buf(),
        &settings,
    );

    let summary = run_sweep(&ctx, &targets);
    assert_eq!(summary.outcomes.len(), 3);
    assert_eq!(summary.logs_scanned, 2);

    let widget = &summary.outcomes[0];
    assert_eq!(widget.target_name(), "WidgetStore");
    assert_eq!(widget.logs_scanned(), 2);
    let counts = widget.exception_counts();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts["com.foo.custom.WidgetNotFoundException"], 1);
    assert_eq!(counts["com.foo.cache.CacheOverflowError"], 1);
    assert!(widget.problems().is_empty());

    // Both hosts are missing for the ghost target, one problem per directory.
    let ghost = &summary.outcomes[1];
    assert_eq!(ghost.logs_scanned(), 0);
    assert_eq!(ghost.total_exceptions(), 0);
    let ghost_problems = ghost.problems();
    assert_eq!(ghost_problems.len(), 2);
    assert!(ghost_problems
        .iter()
        .all(|p| p.message == "Directory does not exist."));

    let quiet = &summary.outcomes[2];
    assert_eq!(quiet.logs_scanned(), 0);
    let quiet_problems = quiet.problems();
    assert_eq!(quiet_problems.len(), 2);
    assert!(quiet_problems
        .iter()
        .all(|p| p.message.starts_with("No logs found")));
}

#[test]
fn current_day_sweep_picks_up_active_logs() {
    let remote = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();

    let logs = remote.path().join("hostA").join("apps").join("widget").join("logs");
    write_log(&logs, "App.widget.log", "com.foo.LiveException: now\n");
    write_log(
        &logs,
        "App.widget.log.2024-01-04_1.log",
        "com.foo.StaleException: yesterday\n",
    );

    let mut classes = BTreeMap::new();
    classes.insert(
        "Private".to_string(),
        vec![remote.path().join("hostA").display().to_string()],
    );

    let mut settings = SweepSettings::default();
    settings.copy_retry_delay_secs = 0;

    let today = date(2024, 1, 5);
    let ctx = SweepContext::new(
        AccessRegistry::new(classes),
        ScanDate::new(today, today),
        work.path().to_path_buf(),
        &settings,
    );

    let targets = vec![app_target("WidgetStore", "Private", "/apps/widget/logs", "App.")];
    let summary = run_sweep(&ctx, &targets);

    // Only the live log qualifies: the rotated file is from another day.
    assert_eq!(summary.logs_scanned, 1);
    let counts = summary.outcomes[0].exception_counts();
    assert_eq!(counts["com.foo.LiveException"], 1);
    assert!(!counts.contains_key("com.foo.StaleException"));
}

#[test]
fn server_targets_stage_one_directory_per_host() {
    let remote = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();

    let host_a = remote.path().join("node4540");
    let host_b = remote.path().join("node4541");
    write_log(&host_a, "Error.cluster.log.24.01.05.log", "com.foo.AException: a\n");
    write_log(&host_b, "Error.cluster.log.24.01.05.log", "com.foo.BException: b\n");

    let target = ScanTarget {
        name: "CommonCluster".into(),
        environment: "production".into(),
        kind: TargetKind::Server,
        access: "Private".into(),
        paths: vec![
            host_a.display().to_string(),
            host_b.display().to_string(),
        ],
        prefixes: vec!["Error.".into()],
        stage_layout: None,
    };
    assert_eq!(target.effective_stage_layout(), StageLayout::PerHost);

    let mut settings = SweepSettings::default();
    settings.copy_retry_delay_secs = 0;

    let ctx = SweepContext::new(
        AccessRegistry::default(),
        ScanDate::new(date(2024, 1, 5), date(2024, 1, 6)),
        work.path().to_path_buf(),
        &settings,
    );

    let summary = run_sweep(&ctx, &[target]);
    assert_eq!(summary.logs_scanned, 2);

    // Identical file names from two hosts must not clobber each other.
    assert!(work
        .path()
        .join("node4540")
        .join("Error.cluster.log.24.01.05.log")
        .exists());
    assert!(work
        .path()
        .join("node4541")
        .join("Error.cluster.log.24.01.05.log")
        .exists());

    let counts = summary.outcomes[0].exception_counts();
    assert_eq!(counts["com.foo.AException"], 1);
    assert_eq!(counts["com.foo.BException"], 1);
}
