//! Headless ecosystem runner
//!
//! Steps a world, logs population counts to CSV and optionally prints
//! ASCII frames.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use ecosim::core::error::Result;
use ecosim::core::types::Species;
use ecosim::metrics::{PopulationLog, RollingWindow};
use ecosim::{Ecosystem, SimulationConfig};

/// Predator-prey grid simulation
#[derive(Parser, Debug)]
#[command(name = "ecosim")]
#[command(about = "Run a seeded predator-prey ecosystem and log its populations")]
struct Args {
    /// TOML config file (defaults are used for anything it leaves out)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(long, default_value_t = 500)]
    ticks: u64,

    /// Override the config seed
    #[arg(long)]
    seed: Option<u64>,

    /// CSV population log
    #[arg(long, default_value = "population_log.csv")]
    log: PathBuf,

    /// Override the chart window size
    #[arg(long)]
    window: Option<usize>,

    /// Print an ASCII frame every N ticks (0 = never)
    #[arg(long, default_value_t = 0)]
    print_every: u64,

    /// Sleep between ticks according to display.fps
    #[arg(long)]
    paced: bool,

    /// Write the final world snapshot as JSON
    #[arg(long)]
    snapshot_json: Option<PathBuf>,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Stop as soon as either species dies out
    #[arg(long)]
    stop_on_extinction: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ecosim=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let (config, issues) = SimulationConfig::load(path)?;
            for issue in &issues {
                tracing::warn!("{}: {}", path.display(), issue);
            }
            config
        }
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(window) = args.window {
        config.display.chart_window = window;
    }

    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let mut eco = Ecosystem::new(config)?;
    let mut log = PopulationLog::create_or_warn(&args.log);
    let mut window = RollingWindow::new(eco.config().display.chart_window);
    let frame_time = Duration::from_secs_f64(1.0 / eco.config().display.fps.max(1) as f64);

    let start = eco.population();
    if let Some(log) = log.as_mut() {
        log.record(&start);
    }
    window.push(start);

    let mut eaten = 0;
    let mut births = 0;
    let mut starved = 0;

    while eco.tick() < args.ticks {
        let report = eco.step();
        eaten += report.prey_eaten;
        births += report.herbivores.births + report.predators.births;
        starved += report.herbivores.starved + report.predators.starved;

        let record = eco.population();
        if let Some(log) = log.as_mut() {
            log.record(&record);
        }
        window.push(record);

        if args.print_every > 0 && eco.tick() % args.print_every == 0 {
            println!(
                "tick {:>6}  herbivores {:>5}  predators {:>5}  food {:>6}",
                record.tick, record.herbivores, record.predators, record.food_cells
            );
            print!("{}", eco.snapshot().render_ascii());
        }

        if args.stop_on_extinction
            && (eco.is_extinct(Species::Herbivore) || eco.is_extinct(Species::Predator))
        {
            tracing::info!("Extinction at tick {}", eco.tick());
            break;
        }

        if args.paced {
            std::thread::sleep(frame_time);
        }
    }
    if let Some(log) = log.as_mut() {
        log.flush();
    }

    if let Some(path) = &args.snapshot_json {
        std::fs::write(path, eco.snapshot().to_json()?)?;
        tracing::info!("Wrote snapshot to {}", path.display());
    }

    let (peak_herbivores, peak_predators) = window.peaks();
    let last = eco.population();
    println!("=== ecosim summary ===");
    println!("Seed:          {}", eco.config().seed);
    println!("Ticks run:     {}", eco.tick());
    println!("Herbivores:    {} (window peak {})", last.herbivores, peak_herbivores);
    println!("Predators:     {} (window peak {})", last.predators, peak_predators);
    println!("Food cells:    {}", last.food_cells);
    println!("Births:        {}", births);
    println!("Starved:       {}", starved);
    println!("Prey eaten:    {}", eaten);
    match &log {
        Some(log) => {
            println!("Log rows:      {} ({})", log.rows(), log.path().display());
            if log.failed_writes() > 0 {
                println!("Failed writes: {}", log.failed_writes());
            }
        }
        None => println!("Log rows:      none (could not open {})", args.log.display()),
    }

    Ok(())
}
