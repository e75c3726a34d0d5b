use anyhow::{Context, Result};
use boid_runner::{load_settings, parse_position, RunOptions, Runner};
use boid_shared::{FoodDrop, Position, SimulationSettings};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless boid flocking simulation", long_about = None)]
struct Args {
    /// JSON settings file; command line options override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of boids
    #[arg(short, long)]
    boids: Option<usize>,

    /// Arena width
    #[arg(long)]
    width: Option<f32>,

    /// Arena height
    #[arg(long)]
    height: Option<f32>,

    /// Spatial grid cell size, at least the largest interaction radius (50)
    #[arg(long)]
    cell_size: Option<f32>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Write a JSON frame snapshot every N frames (0 = never)
    #[arg(short, long, default_value_t = 0)]
    snapshot_every: u64,

    /// Snapshot file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Place food at X,Y before the first frame; repeatable
    #[arg(long = "food", value_name = "X,Y", value_parser = parse_position)]
    food: Vec<Position>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn settings(&self) -> Result<SimulationSettings> {
        let mut settings = match &self.config {
            Some(path) => load_settings(path)?,
            None => SimulationSettings::default(),
        };

        if let Some(boids) = self.boids {
            settings.boid_count = boids;
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(cell_size) = self.cell_size {
            settings.cell_size = cell_size;
        }
        settings
            .food
            .extend(self.food.iter().map(|&position| FoodDrop { frame: 0, position }));

        Ok(settings)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let settings = args.settings()?;
    log::info!("Boid runner starting...");
    log::info!(
        "{} boids in a {}x{} arena, grid cells of {}",
        settings.boid_count,
        settings.width,
        settings.height,
        settings.cell_size
    );
    log::info!("Weights: {:?}", settings.weights);
    log::info!("{} food drop(s) scheduled", settings.food.len());

    let mut runner = Runner::new(&settings).context("Failed to initialize runner")?;
    let options = RunOptions {
        frames: args.frames,
        snapshot_every: args.snapshot_every,
    };

    let summary = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            runner.run(&options, &mut BufWriter::new(file))
        }
        None => runner.run(&options, &mut BufWriter::new(io::stdout().lock())),
    }
    .context("Simulation run failed")?;

    log::info!(
        "Ran {} frames in {} ms, {} food eaten, {} left, mean speed {:.2}",
        summary.frames,
        summary.elapsed_ms,
        summary.food_consumed,
        summary.food_remaining,
        summary.mean_speed
    );

    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &summary).context("Failed to write run summary")?;
    writeln!(stdout).context("Failed to write run summary")?;

    Ok(())
}
