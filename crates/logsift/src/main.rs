//! Logsift batch entry point.
//!
//! Scans configured fleets of log directories for exception class names and
//! writes per-target count reports. Logging goes to a daily-rolling file
//! under the app home directory and to stderr, so stdout stays clean for the
//! summary table and report paths.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use logsift::config;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "logsift", about = "Scans fleet log shares for exception counts")]
struct Cli {
    /// Enable verbose logging on the console
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan an environment's log directories and write the reports
    Run(cli::run::RunArgs),

    /// List configured targets and their resolved directories
    Targets(cli::targets::TargetsArgs),

    /// Show resolved configuration paths
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => cli::run::run(args),
        Commands::Targets(args) => cli::targets::run(args),
        Commands::Config { json } => run_config(json),
    }
}

fn run_config(json: bool) -> Result<()> {
    let home = config::logsift_home();
    let config_path = config::default_config_path();
    let work = config::work_dir();
    let reports = config::reports_dir();
    let logs = config::logs_dir();

    if json {
        let paths = serde_json::json!({
            "home": home.to_string_lossy(),
            "config": {
                "path": config_path.to_string_lossy(),
                "exists": config_path.exists(),
            },
            "work": work.to_string_lossy(),
            "reports": reports.to_string_lossy(),
            "logs": logs.to_string_lossy(),
        });
        println!("{}", serde_json::to_string_pretty(&paths)?);
    } else {
        println!("Home:    {}", home.display());
        println!(
            "Config:  {} ({})",
            config_path.display(),
            if config_path.exists() { "exists" } else { "not found" }
        );
        println!("Work:    {}", work.display());
        println!("Reports: {}", reports.display());
        println!("Logs:    {}", logs.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = "logsift=info";
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let mut _log_guard: Option<tracing_appender::non_blocking::WorkerGuard> = None;
    let file_layer = match config::ensure_logs_dir() {
        Ok(log_dir) => {
            let file_appender = tracing_appender::rolling::daily(log_dir, "logsift.log");
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            _log_guard = Some(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_filter(env_filter.clone()),
            )
        }
        Err(err) => {
            eprintln!("Warning: failed to create logs directory: {}", err);
            None
        }
    };

    let console_filter = if cli.verbose {
        EnvFilter::new("logsift=debug")
    } else {
        env_filter
    };
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:?}", err);
            ExitCode::from(1)
        }
    }
}
