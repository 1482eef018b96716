//! Targets command - inspect configured targets and their resolved paths.

use anyhow::Result;
use std::path::PathBuf;

use logsift::config::{self, SweepConfig};
use logsift::sweep::resolve_paths;

use crate::cli::output::print_table;

/// Arguments for the targets command
#[derive(Debug, clap::Args)]
pub struct TargetsArgs {
    /// Restrict the listing to one environment
    pub environment: Option<String>,

    /// Path to the sweep configuration file
    #[arg(long, env = "LOGSIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the targets command.
pub fn run(args: TargetsArgs) -> Result<()> {
    let config_path = args.config.unwrap_or_else(config::default_config_path);
    let config = SweepConfig::load(&config_path)?;

    let targets: Vec<_> = config
        .targets
        .iter()
        .filter(|target| {
            args.environment
                .as_deref()
                .map(|env| target.environment == env)
                .unwrap_or(true)
        })
        .collect();

    if args.json {
        let listing: Vec<serde_json::Value> = targets
            .iter()
            .map(|&target| {
                serde_json::json!({
                    "name": target.name,
                    "environment": target.environment,
                    "kind": target.kind.as_str(),
                    "access": target.access,
                    "prefixes": target.prefixes,
                    "resolved_paths": resolve_paths(target, &config.access_classes),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = targets
        .iter()
        .map(|&target| {
            vec![
                target.name.clone(),
                target.environment.clone(),
                target.kind.to_string(),
                target.access.clone(),
                target.prefixes.join(", "),
                resolve_paths(target, &config.access_classes).len().to_string(),
            ]
        })
        .collect();

    print_table(
        &["Name", "Environment", "Kind", "Access", "Prefixes", "Dirs"],
        rows,
    );
    println!("{} targets configured", targets.len());

    Ok(())
}
