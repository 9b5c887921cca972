use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use depotgeom::config::{FileConfig, SpaceOutput};
use depotgeom::plan::{PlanFile, PlanReport, evaluate};

/// Place, validate and tile the parking areas of a depot plan
///
/// Examples:
///   # Evaluate a plan and print the JSON report
///   depotgeom depot.toml
///
///   # Write geographic parking spaces to a file
///   depotgeom depot.toml --spaces global -o report.json
///
///   # Only check placements, with wider gaps between vehicles
///   depotgeom depot.toml --spaces none --spacing 0.8
///
///   # Use a config file
///   depotgeom depot.toml --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "depotgeom")]
#[command(version, about, long_about = None)]
struct Args {
    /// Depot plan (TOML)
    plan: PathBuf,

    /// Path to config file (optional, auto-searches depotgeom.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output JSON file (defaults to stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Frame for parking spaces: local, global or none
    #[arg(long, value_enum)]
    spaces: Option<SpaceOutput>,

    /// Gap between vehicles in meters
    #[arg(long)]
    spacing: Option<f64>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if !config_path.exists() {
            bail!("Config file not found: {:?}", config_path);
        }
        FileConfig::from_path(config_path)?
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let verbose = args.verbose || file_config.verbose;
    init_logging(verbose);

    let mut layout = file_config.layout;
    if let Some(spacing) = args.spacing {
        if !spacing.is_finite() || spacing < 0.0 {
            bail!("--spacing must be a non-negative number of meters, got {}", spacing);
        }
        layout = layout.with_spacing(spacing);
    }
    let spaces = args.spaces.unwrap_or(file_config.spaces);
    let output = args.output.clone().or(file_config.output.clone());

    if verbose {
        eprintln!("Configuration:");
        eprintln!("  Plan: {}", args.plan.display());
        eprintln!("  Spacing: {}m", layout.spacing);
        eprintln!("  Park angle: {}°", layout.park_angle_deg);
        eprintln!("  Rectangle tolerance: {}", layout.rectangle_tolerance);
        eprintln!("  Spaces: {:?}", spaces);
        match output {
            Some(ref path) => eprintln!("  Output: {}", path.display()),
            None => eprintln!("  Output: stdout"),
        }
        eprintln!();
    }

    let plan = PlanFile::load(&args.plan)?;
    tracing::info!(
        "Loaded depot {:?} with {} areas",
        plan.depot.name,
        plan.areas.len()
    );

    let report = evaluate(&plan, &layout, spaces)
        .with_context(|| format!("Failed to evaluate plan {:?}", args.plan))?;

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    match output {
        Some(ref path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write report: {:?}", path))?,
        None => println!("{}", json),
    }

    print_summary(&report);
    eprintln!("Done in {:.2}s", start.elapsed().as_secs_f32());

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "depotgeom=debug"
    } else {
        "depotgeom=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(report: &PlanReport) {
    eprintln!();
    eprintln!("Depot {}", report.depot_name);
    eprintln!(
        "  Footprint: {}",
        if report.depot_valid { "valid" } else { "INVALID" }
    );

    for area in &report.areas {
        let name = area.name.as_deref().unwrap_or("<unnamed>");
        let status = match (&area.error, area.valid) {
            (Some(e), _) => format!("error: {}", e),
            (None, Some(true)) => "valid".to_string(),
            (None, Some(false)) => format!("invalid ({} issues)", area.issues.len()),
            (None, None) => "no footprint".to_string(),
        };
        eprintln!(
            "  {:<20} {:<15} {:>4} vehicles  {}",
            name,
            area.layout.to_string(),
            area.capacity,
            status
        );
    }

    eprintln!();
    eprintln!(
        "{} of {} areas valid, {} failed, {} parking spaces",
        report.valid_area_count(),
        report.areas.len(),
        report.failed_area_count(),
        report.space_count()
    );
}
