use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use modscout_analysis::host::SnapshotGraph;
use modscout_analysis::report::{self, Report, Summary};
use modscout_core::config::{split_csv, CliOverrides, ModscoutConfig};
use modscout_core::constants::{DEFAULT_CLI_LIMIT, EXAMPLE_CONFIG_FILE, VERSION};
use modscout_core::tracing::init_tracing;

#[derive(Parser)]
#[command(name = "modscout")]
#[command(about = "Walk a program's object graph breadth-first and flag risky reachable modules and callables")]
#[command(version)]
struct Cli {
    /// Path to a JSON (or .toml) config. See --write-example to generate one.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Object-graph snapshot of the host process to scan.
    #[arg(long, required_unless_present = "write_example")]
    snapshot: Option<PathBuf>,

    /// Comma-separated roots to scan (overrides config).
    #[arg(long)]
    roots: Option<String>,

    /// Comma-separated shorthand categories, e.g. 'system,builtin' (adds to rules).
    #[arg(long)]
    targets: Option<String>,

    /// Override scan.max_depth.
    #[arg(long)]
    max_depth: Option<u32>,

    /// Also use computed lookups when the attribute table lacks a name
    /// (may run host code).
    #[arg(long)]
    risk_getattr: bool,

    /// Write modscan.example.json and exit.
    #[arg(long)]
    write_example: bool,

    /// Where to write the JSON report (overrides output.json_path).
    #[arg(long)]
    json_out: Option<String>,

    /// Limit findings in the JSON report (0 = no limit).
    #[arg(long, default_value_t = DEFAULT_CLI_LIMIT)]
    limit: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            roots: self.roots.as_deref().map(split_csv),
            targets: self.targets.as_deref().map(split_csv).unwrap_or_default(),
            max_depth: self.max_depth,
            risk_getattr: self.risk_getattr,
            json_out: self.json_out.clone(),
            limit: Some(self.limit),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.write_example {
        return write_example(Path::new(EXAMPLE_CONFIG_FILE));
    }

    let config = ModscoutConfig::load(cli.config.as_deref(), Some(&cli.overrides()))
        .context("failed to load configuration")?;

    let snapshot_path = cli
        .snapshot
        .as_deref()
        .context("--snapshot is required to run a scan")?;
    let graph = SnapshotGraph::load(snapshot_path)
        .with_context(|| format!("failed to load snapshot {}", snapshot_path.display()))?;

    tracing::debug!(
        version = VERSION,
        roots = ?config.roots,
        rules = config.rules.len(),
        objects = graph.object_count(),
        "starting scan"
    );
    let outcome = modscout_analysis::scan(&graph, &config);

    let summary = Summary::from_findings(&outcome.findings);
    print!("{}", report::render(&config.roots, &summary, &outcome.findings));

    if let Some(out_path) = config.output.json_path.as_deref() {
        let report = Report::build(&config, &outcome.findings);
        let out_path = Path::new(out_path);
        report.write_json(out_path)?;
        println!(
            "\nSaved JSON report to {}  (items written: {}/{})",
            out_path.display(),
            report.written(),
            report.total_matches
        );
    }

    if outcome.stats.truncated {
        tracing::warn!(
            visited = outcome.stats.objects_visited,
            "object budget exhausted before the frontier emptied; results are partial"
        );
    }

    Ok(())
}

fn write_example(path: &Path) -> Result<()> {
    let json = ModscoutConfig::example().to_json_pretty()?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
