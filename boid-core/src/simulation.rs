use alloc::vec::Vec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::boid::Boid;
use crate::config::{Arena, InvalidSimConfig, SimConfig, Weights};
use crate::food::{Consumption, FoodRegistry};
use crate::grid::SpatialGrid;
use crate::vector::Vector2D;

/// What happened during one call to [`Simulation::step`]
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// frame number just completed, starting at 1
    pub frame: u64,
    pub consumed: Vec<Consumption>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockStats {
    pub frame: u64,
    pub boid_count: usize,
    pub food_count: usize,
    pub mean_speed: f32,
}

/// Owns the flock, the food and the grid, and advances them one frame at a time.
pub struct Simulation {
    config: SimConfig,
    boids: Vec<Boid>,
    food: FoodRegistry,
    grid: SpatialGrid,
    forces: Vec<Vector2D>,
    positions: Vec<Vector2D>,
    frame: u64,
}

impl Simulation {
    /// Spawns `config.boid_count` boids at random inside the arena.
    #[cfg(feature = "std")]
    pub fn new(config: SimConfig) -> Result<Self, InvalidSimConfig> {
        config.validate()?;
        let boids = (0..config.boid_count)
            .map(|_| Boid::random(config.arena.width, config.arena.height))
            .collect();
        Self::assemble(config, boids)
    }

    /// Starts from a caller-built flock. `config.boid_count` is replaced by the flock size.
    pub fn with_boids(config: SimConfig, boids: Vec<Boid>) -> Result<Self, InvalidSimConfig> {
        config.validate()?;
        Self::assemble(config, boids)
    }

    fn assemble(mut config: SimConfig, boids: Vec<Boid>) -> Result<Self, InvalidSimConfig> {
        config.boid_count = boids.len();
        let grid = SpatialGrid::new(config.arena.width, config.arena.height, config.cell_size)?;
        log::debug!(
            "Simulation ready: {} boids in a {}x{} arena",
            boids.len(),
            config.arena.width,
            config.arena.height
        );

        Ok(Self {
            config,
            forces: Vec::with_capacity(boids.len()),
            positions: Vec::with_capacity(boids.len()),
            boids,
            food: FoodRegistry::new(),
            grid,
            frame: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn arena(&self) -> Arena {
        self.config.arena
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn food(&self) -> &FoodRegistry {
        &self.food
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Number of completed frames
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn place_food(&mut self, point: Vector2D) {
        self.food.add(point);
    }

    /// Advances one frame: rebuild the grid, compute every boid's steering
    /// from the pre-move flock, move and bounce every boid, then let the moved
    /// boids eat.
    pub fn step(&mut self, weights: &Weights) -> StepReport {
        self.grid.rebuild(&self.boids);
        self.compute_forces(weights);
        self.integrate();

        self.positions.clear();
        self.positions.extend(self.boids.iter().map(|boid| boid.position));
        let consumed = self
            .food
            .consume_near(&self.positions, self.config.consumption_radius);

        self.frame += 1;
        for eaten in &consumed {
            log::trace!(
                "Frame {}: boid {} ate food at ({:.1}, {:.1})",
                self.frame,
                eaten.boid,
                eaten.food.x,
                eaten.food.y
            );
        }

        StepReport {
            frame: self.frame,
            consumed,
        }
    }

    fn compute_forces(&mut self, weights: &Weights) {
        let boids = &self.boids;
        let grid = &self.grid;
        let food = self.food.points();
        let arena = self.config.arena;
        let config = &self.config.boid;

        let force_of = |index: usize| {
            let boid = &boids[index];
            let neighbors = grid
                .query_neighborhood(boid.position)
                .filter(move |&other| other != index)
                .map(|other| &boids[other]);
            boid.steering_force(neighbors, food, &arena, weights, config)
        };

        self.forces.clear();
        self.forces.resize(boids.len(), Vector2D::zero());

        #[cfg(feature = "parallel")]
        self.forces
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, force)| *force = force_of(index));

        #[cfg(not(feature = "parallel"))]
        for (index, force) in self.forces.iter_mut().enumerate() {
            *force = force_of(index);
        }
    }

    fn integrate(&mut self) {
        let max_speed = self.config.boid.max_speed;
        let arena = self.config.arena;

        let advance = |(boid, force): (&mut Boid, &Vector2D)| {
            boid.apply_force(*force);
            boid.update(max_speed);
            boid.bounce_off_edges(arena.width, arena.height);
        };

        #[cfg(feature = "parallel")]
        self.boids
            .par_iter_mut()
            .zip(self.forces.par_iter())
            .for_each(advance);

        #[cfg(not(feature = "parallel"))]
        self.boids.iter_mut().zip(self.forces.iter()).for_each(advance);
    }

    pub fn stats(&self) -> FlockStats {
        let mean_speed = if self.boids.is_empty() {
            0.0
        } else {
            self.boids
                .iter()
                .map(|boid| boid.velocity.magnitude())
                .sum::<f32>()
                / self.boids.len() as f32
        };

        FlockStats {
            frame: self.frame,
            boid_count: self.boids.len(),
            food_count: self.food.len(),
            mean_speed,
        }
    }
}
