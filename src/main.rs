//! sens-copy
//!
//! Copies per-hero mouse sensitivity between game accounts. `capture` reads
//! every hero's value off the settings screens into a JSON file; `replay`
//! types those values back in on another account.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sens_copy::automation::{self, AutomationContext, StopSignal};
use sens_copy::config::{Config, load_config};
use sens_copy::driver::create_driver;
use sens_copy::geometry::{Point, distance};
use sens_copy::motion::controller::PIXELS_PER_SAMPLE;
use sens_copy::motion::{ScreenController, generate_curve};
use sens_copy::ocr::{OcrReader, TesseractEngine, ensure_tesseract};
use sens_copy::{Error, log, paths, store};

#[derive(Parser)]
#[command(name = "sens-copy")]
#[command(about = "Copy per-hero mouse sensitivity between accounts", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to config.json next to the executable)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read every hero's sensitivity from the settings screens
    Capture {
        /// Settings file to write
        #[arg(short, long, default_value = "settings.json")]
        output: PathBuf,

        /// Move the cursor along randomized curves
        #[arg(long)]
        human: bool,
    },

    /// Apply a captured settings file to the current account
    Replay {
        /// Settings file to read
        #[arg(short, long, default_value = "settings.json")]
        input: PathBuf,

        /// Move the cursor along randomized curves
        #[arg(long)]
        human: bool,
    },

    /// Print a generated cursor curve without moving anything
    CheckCurve {
        /// Start point as X,Y
        #[arg(long, value_parser = parse_point)]
        from: Point,

        /// End point as X,Y
        #[arg(long, value_parser = parse_point)]
        to: Point,

        /// Number of samples (defaults to one per 50 px of distance)
        #[arg(short = 'n', long)]
        samples: Option<usize>,

        /// RNG seed for a reproducible curve
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn parse_point(s: &str) -> std::result::Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{}'", s))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad X '{}': {}", x, e))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad Y '{}': {}", y, e))?;
    Ok(Point::new(x, y))
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = panic_info
            .location()
            .map(|loc| format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_default();
        log(&format!("[PANIC]{} {}", location, msg));
    }));
}

/// Stop signal wired to the global hotkey where the platform has one.
fn stop_signal() -> StopSignal {
    let stop = StopSignal::new();
    #[cfg(target_os = "windows")]
    sens_copy::driver::windows::start_stop_hotkey(stop.clone());
    stop
}

fn context(config: Config, human: bool) -> Result<AutomationContext> {
    let controller = ScreenController::new(create_driver(), human);
    AutomationContext::new(controller, config, stop_signal()).context("Failed to query display")
}

fn run_capture(config: Config, output: &Path, human: bool) -> Result<()> {
    let tesseract = ensure_tesseract().context("Tesseract is required for capture")?;
    let heroes_dir = config.heroes_dir();
    let engine = Arc::new(TesseractEngine::new(tesseract, config.tesseract_psm));

    let ctx = context(config, human)?;
    let reader = Arc::new(OcrReader::new(Arc::clone(ctx.driver()), engine));

    log(&format!(
        "Capturing with hero cards from {}",
        heroes_dir.display()
    ));
    let records = automation::capture_settings(&ctx, reader, &heroes_dir)
        .context("Capture failed")?;
    store::save_records(output, &records)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}

fn run_replay(config: Config, input: &Path, human: bool) -> Result<()> {
    let records = store::load_records(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let ctx = context(config, human)?;
    let summary = automation::replay(&ctx, &records).context("Replay failed")?;
    if summary.skipped > 0 {
        log(&format!(
            "{} heroes could not be found on the roster",
            summary.skipped
        ));
    }
    Ok(())
}

fn check_curve(
    config: &Config,
    from: Point,
    to: Point,
    samples: Option<usize>,
    seed: Option<u64>,
) -> Result<()> {
    let samples =
        samples.unwrap_or_else(|| (distance(from, to) / PIXELS_PER_SAMPLE).floor() as usize);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let curve = generate_curve(from, to, samples, config.design_resolution, &mut rng);
    log(&format!(
        "Curve ({:.0},{:.0}) -> ({:.0},{:.0}): {}/{} points",
        from.x,
        from.y,
        to.x,
        to.y,
        curve.len(),
        samples
    ));
    for p in &curve {
        println!("{:.2},{:.2}", p.x, p.y);
    }
    Ok(())
}

fn main() -> Result<()> {
    install_panic_hook();
    let cli = Cli::parse();

    paths::ensure_directories().context("Failed to create output directories")?;
    let config_path = cli.config.unwrap_or_else(paths::get_config_path);
    let config = load_config(&config_path);

    let result = match cli.command {
        Commands::Capture { output, human } => run_capture(config, &output, human),
        Commands::Replay { input, human } => run_replay(config, &input, human),
        Commands::CheckCurve {
            from,
            to,
            samples,
            seed,
        } => check_curve(&config, from, to, samples, seed),
    };

    if let Err(e) = &result {
        if matches!(e.root_cause().downcast_ref::<Error>(), Some(Error::Aborted)) {
            log("Stopped by hotkey");
            return Ok(());
        }
        log(&format!("Error: {:#}", e));
    }
    result
}
