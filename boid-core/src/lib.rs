#![cfg_attr(not(feature = "std"), no_std)]

//! Flocking simulation core: boids steered by their neighbours, food,
//! the arena walls, an ambient current and their own recent trail.
//!
//! The `parallel` feature computes steering forces and moves boids on the
//! rayon thread pool. Both paths share the simulation tests, so run them
//! twice: `cargo test -p boid-core` and
//! `cargo test -p boid-core --features parallel`.

extern crate alloc;

pub mod behavior;
pub mod boid;
pub mod config;
pub mod food;
pub mod grid;
pub mod simulation;
pub mod vector;

pub use boid::{Boid, Rgb, PALETTE};
pub use config::{Arena, BoidConfig, ConfigError, InvalidSimConfig, SimConfig, Weights};
pub use food::{Consumption, FoodRegistry};
pub use grid::SpatialGrid;
pub use simulation::{FlockStats, Simulation, StepReport};
pub use vector::Vector2D;
