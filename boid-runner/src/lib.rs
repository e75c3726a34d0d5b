use anyhow::{bail, Context, Result};
use boid_core::{Arena, SimConfig, Simulation, Vector2D, Weights};
use boid_shared::{
    BoidSnapshot, FoodDrop, FrameSnapshot, Position, RunSummary, SimulationSettings,
    WeightSettings,
};
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Reads a JSON settings file. Missing fields fall back to their defaults.
pub fn load_settings(path: &Path) -> Result<SimulationSettings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse settings file {}", path.display()))
}

/// Parses `X,Y` into a position, e.g. `640,360`
pub fn parse_position(text: &str) -> Result<Position> {
    let Some((x, y)) = text.split_once(',') else {
        bail!("Expected a position as X,Y but got '{}'", text);
    };
    let x: f32 = x
        .trim()
        .parse()
        .with_context(|| format!("Invalid x coordinate in '{}'", text))?;
    let y: f32 = y
        .trim()
        .parse()
        .with_context(|| format!("Invalid y coordinate in '{}'", text))?;
    Ok(Position::new(x, y))
}

/// Converts slider settings into core weights, clamping anything outside [0, 5]
pub fn weights_from_settings(settings: &WeightSettings) -> Weights {
    let weights = Weights {
        alignment: settings.alignment,
        cohesion: settings.cohesion,
        separation: settings.separation,
        attraction: settings.attraction,
        boundary_avoidance: settings.boundary_avoidance,
        current: settings.current,
        memory: settings.memory,
    };
    let clamped = weights.clamped();
    if clamped != weights {
        log::warn!(
            "Behavior weights must lie in [0, 5], clamped {:?} to {:?}",
            weights,
            clamped
        );
    }
    clamped
}

pub fn config_from_settings(settings: &SimulationSettings) -> SimConfig {
    SimConfig {
        boid_count: settings.boid_count,
        arena: Arena::new(settings.width, settings.height),
        cell_size: settings.cell_size,
        ..SimConfig::default()
    }
}

/// Captures everything a renderer draws for the current frame
pub fn snapshot(sim: &Simulation) -> FrameSnapshot {
    FrameSnapshot {
        frame: sim.frame(),
        boids: sim
            .boids()
            .iter()
            .map(|boid| {
                let color = boid.color();
                BoidSnapshot {
                    position: Position::new(boid.position.x, boid.position.y),
                    heading: boid.heading(),
                    color: [color.r, color.g, color.b],
                }
            })
            .collect(),
        food: sim
            .food()
            .points()
            .iter()
            .map(|point| Position::new(point.x, point.y))
            .collect(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub frames: u64,
    /// write a snapshot every N frames, 0 disables snapshots
    pub snapshot_every: u64,
}

/// Drives a [`Simulation`] without a window: scheduled food drops stand in
/// for clicks and frames are reported as JSON lines.
pub struct Runner {
    sim: Simulation,
    weights: Weights,
    schedule: Vec<FoodDrop>,
    food_consumed: usize,
}

impl Runner {
    pub fn new(settings: &SimulationSettings) -> Result<Self> {
        let config = config_from_settings(settings);
        let sim = Simulation::new(config).context("Failed to set up the simulation")?;
        let weights = weights_from_settings(&settings.weights);
        Ok(Self::from_simulation(sim, weights, settings.food.clone()))
    }

    /// Wraps an existing simulation; drops outside the arena are discarded.
    pub fn from_simulation(sim: Simulation, weights: Weights, mut schedule: Vec<FoodDrop>) -> Self {
        let arena = sim.arena();
        schedule.retain(|drop| {
            let inside = arena.contains(drop.position.x, drop.position.y);
            if !inside {
                log::warn!(
                    "Ignoring food at ({}, {}) outside the {}x{} arena",
                    drop.position.x,
                    drop.position.y,
                    arena.width,
                    arena.height
                );
            }
            inside
        });
        // stable, so drops for the same frame keep their order
        schedule.sort_by_key(|drop| drop.frame);

        Self {
            sim,
            weights,
            schedule,
            food_consumed: 0,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn weights(&self) -> Weights {
        self.weights
    }

    fn drop_due_food(&mut self) {
        let frame = self.sim.frame();
        let due = self
            .schedule
            .iter()
            .take_while(|drop| drop.frame <= frame)
            .count();
        for drop in self.schedule.drain(..due) {
            log::debug!(
                "Frame {}: food placed at ({}, {})",
                frame,
                drop.position.x,
                drop.position.y
            );
            self.sim
                .place_food(Vector2D::new(drop.position.x, drop.position.y));
        }
    }

    pub fn run<W: Write>(&mut self, options: &RunOptions, out: &mut W) -> Result<RunSummary> {
        let started = Instant::now();
        let last_frame = self.sim.frame() + options.frames;
        if let Some(late) = self.schedule.iter().find(|drop| drop.frame >= last_frame) {
            log::warn!(
                "Food scheduled for frame {} falls after the last frame {}",
                late.frame,
                last_frame
            );
        }

        for _ in 0..options.frames {
            self.drop_due_food();
            let report = self.sim.step(&self.weights);
            self.food_consumed += report.consumed.len();

            if options.snapshot_every > 0 && report.frame % options.snapshot_every == 0 {
                serde_json::to_writer(&mut *out, &snapshot(&self.sim))
                    .context("Failed to serialize frame snapshot")?;
                writeln!(out).context("Failed to write frame snapshot")?;
            }

            if report.frame % 100 == 0 {
                let stats = self.sim.stats();
                log::debug!(
                    "Frame {}: mean speed {:.2}, {} food left",
                    stats.frame,
                    stats.mean_speed,
                    stats.food_count
                );
            }
        }
        out.flush().context("Failed to flush output")?;

        let stats = self.sim.stats();
        Ok(RunSummary {
            frames: stats.frame,
            boid_count: stats.boid_count,
            food_remaining: stats.food_count,
            food_consumed: self.food_consumed,
            mean_speed: stats.mean_speed,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}
