//! desal-optimizer - two-stage desalination scenario optimizer
//!
//! Loads a plant config, optionally reads scenario records, optimizes each
//! and prints a current vs optimized report.
//!
//! # Usage
//!
//! ```bash
//! # Optimize the scenario described by ./desal_config.toml (or defaults)
//! desal-optimizer
//!
//! # Optimize records exported by the data-selection layer, as JSON
//! desal-optimizer --scenario scenarios.json --format json
//!
//! # Show the effective configuration
//! desal-optimizer --goal energy --solver compass --print-config
//! ```
//!
//! # Environment Variables
//!
//! - `DESAL_CONFIG`: Path to the plant config TOML
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use desal_optimizer::{
    DesalConfig, OptimizationGoal, Scenario, ScenarioInput, ScenarioReport, SolverKind,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "desal-optimizer")]
#[command(about = "Two-stage NF/RO desalination simulator and parameter optimizer")]
#[command(version)]
struct CliArgs {
    /// Plant config TOML (overrides DESAL_CONFIG and ./desal_config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON file with one scenario record or an array of them.
    /// Every record field is required. Bounds and solver settings
    /// still come from the config.
    #[arg(short, long, value_name = "PATH")]
    scenario: Option<PathBuf>,

    /// Optimization goal: cost, energy or balance
    #[arg(long)]
    goal: Option<OptimizationGoal>,

    /// Solver: projected_gradient or compass_search
    #[arg(long)]
    solver: Option<SolverKind>,

    /// Iteration budget per optimization run
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "DESAL_LOG_JSON")]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

// ============================================================================
// Scenario Input
// ============================================================================

/// Read scenario records from JSON, accepting a single object or an array.
fn read_scenarios(path: &Path, config: &DesalConfig) -> Result<Vec<Scenario>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    let inputs: Vec<ScenarioInput> = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|one| vec![one])
    }
    .with_context(|| format!("Invalid scenario record in {}", path.display()))?;

    let budget = config.optimization.max_iterations;
    Ok(inputs
        .into_iter()
        .map(|input| input.into_scenario(config.bounds, budget))
        .collect())
}

/// Apply CLI overrides; returns whether any field changed.
fn apply_overrides(config: &mut DesalConfig, args: &CliArgs) -> bool {
    let mut changed = false;
    if let Some(goal) = args.goal {
        config.optimization.goal = goal;
        changed = true;
    }
    if let Some(kind) = args.solver {
        config.solver.kind = kind;
        changed = true;
    }
    if let Some(n) = args.max_iterations {
        config.optimization.max_iterations = n;
        changed = true;
    }
    changed
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if args.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let mut config = match &args.config {
        Some(path) => DesalConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DesalConfig::load(),
    };
    // Loaded configs are already validated
    if apply_overrides(&mut config, &args) {
        config.validate().context("Invalid configuration after CLI overrides")?;
    }

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let scenarios = match &args.scenario {
        Some(path) => read_scenarios(path, &config)?,
        None => vec![config.scenario()],
    };
    if scenarios.is_empty() {
        bail!("No scenarios to optimize");
    }

    let optimizer = config.optimizer();
    info!(
        scenarios = scenarios.len(),
        solver = optimizer.solver_name(),
        goal = %config.optimization.goal,
        "Optimizing"
    );

    let mut reports = Vec::with_capacity(scenarios.len());
    for (i, outcome) in ScenarioReport::compare_many(&scenarios, &optimizer)
        .into_iter()
        .enumerate()
    {
        match outcome {
            Ok(report) => {
                if !report.result.converged {
                    warn!(scenario = i, status = %report.result.status, "Optimizer did not converge");
                }
                reports.push(report);
            }
            Err(e) => bail!("Scenario {i} rejected: {e}"),
        }
    }

    match args.format {
        OutputFormat::Json => {
            let json = if reports.len() == 1 {
                serde_json::to_string_pretty(&reports[0])?
            } else {
                serde_json::to_string_pretty(&reports)?
            };
            println!("{json}");
        }
        OutputFormat::Text => {
            let texts: Vec<String> = reports.iter().map(ScenarioReport::to_text).collect();
            println!("{}", texts.join("\n\n----------------------------------------\n\n"));
        }
    }

    Ok(())
}
