use alloc::vec::Vec;
use core::fmt;

use crate::grid::grid_dimensions;

pub const DEFAULT_BOID_COUNT: usize = 350;
pub const DEFAULT_ARENA_WIDTH: f32 = 1280.0;
pub const DEFAULT_ARENA_HEIGHT: f32 = 720.0;

/// Side length of a spatial grid cell. Must stay at least as large as every
/// interaction radius or the 3x3 neighborhood query can miss neighbors.
pub const DEFAULT_CELL_SIZE: f32 = 120.0;

/// Largest grid a config may ask for, about 8700x8700 units at the default
/// cell size.
pub const MAX_GRID_CELLS: usize = 1 << 20;

pub const MAX_FORCE: f32 = 0.05;
pub const MAX_SPEED: f32 = 4.0;
pub const VISION_RADIUS: f32 = 100.0;
pub const NEIGHBOR_RADIUS: f32 = 50.0;
pub const SEPARATION_RADIUS: f32 = 25.0;
pub const MEMORY_RADIUS: f32 = 50.0;
pub const MEMORY_CAPACITY: usize = 50;
pub const CURRENT_STRENGTH: f32 = 0.03;
pub const CURRENT_SCALE: f32 = 50.0;
pub const CONSUMPTION_RADIUS: f32 = 5.0;

pub const WEIGHT_MIN: f32 = 0.0;
pub const WEIGHT_MAX: f32 = 5.0;

/// The seven behavior weights set from the control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub alignment: f32,
    pub cohesion: f32,
    pub separation: f32,
    pub attraction: f32,
    pub boundary_avoidance: f32,
    pub current: f32,
    pub memory: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            alignment: 1.0,
            cohesion: 1.0,
            separation: 1.5,
            attraction: 1.5,
            boundary_avoidance: 3.0,
            current: 0.3,
            memory: 0.5,
        }
    }
}

impl Weights {
    /// Every behavior switched off. Handy as a base for isolating one behavior.
    pub const fn zero() -> Self {
        Self {
            alignment: 0.0,
            cohesion: 0.0,
            separation: 0.0,
            attraction: 0.0,
            boundary_avoidance: 0.0,
            current: 0.0,
            memory: 0.0,
        }
    }

    /// Copy with every weight pulled into the slider range. NaN becomes the minimum.
    pub fn clamped(&self) -> Self {
        Self {
            alignment: clamp_weight(self.alignment),
            cohesion: clamp_weight(self.cohesion),
            separation: clamp_weight(self.separation),
            attraction: clamp_weight(self.attraction),
            boundary_avoidance: clamp_weight(self.boundary_avoidance),
            current: clamp_weight(self.current),
            memory: clamp_weight(self.memory),
        }
    }
}

pub fn clamp_weight(value: f32) -> f32 {
    if value.is_nan() {
        WEIGHT_MIN
    } else {
        value.clamp(WEIGHT_MIN, WEIGHT_MAX)
    }
}

/// Per-boid limits and interaction radii
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoidConfig {
    pub max_speed: f32,
    pub max_force: f32,
    /// distance from a wall at which boundary avoidance kicks in
    pub vision_radius: f32,
    /// alignment and cohesion
    pub neighbor_radius: f32,
    pub separation_radius: f32,
    pub memory_radius: f32,
    pub current_strength: f32,
    pub current_scale: f32,
}

impl Default for BoidConfig {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            max_force: MAX_FORCE,
            vision_radius: VISION_RADIUS,
            neighbor_radius: NEIGHBOR_RADIUS,
            separation_radius: SEPARATION_RADIUS,
            memory_radius: MEMORY_RADIUS,
            current_strength: CURRENT_STRENGTH,
            current_scale: CURRENT_SCALE,
        }
    }
}

impl BoidConfig {
    /// Largest radius at which another boid can influence this one.
    /// Memory is excluded, it only looks at the boid's own past positions.
    pub fn interaction_radius(&self) -> f32 {
        self.neighbor_radius.max(self.separation_radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(DEFAULT_ARENA_WIDTH, DEFAULT_ARENA_HEIGHT)
    }
}

/// Everything fixed at simulation start-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub boid_count: usize,
    pub arena: Arena,
    pub cell_size: f32,
    pub consumption_radius: f32,
    pub boid: BoidConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            boid_count: DEFAULT_BOID_COUNT,
            arena: Arena::default(),
            cell_size: DEFAULT_CELL_SIZE,
            consumption_radius: CONSUMPTION_RADIUS,
            boid: BoidConfig::default(),
        }
    }
}

impl SimConfig {
    /// Reports every problem at once rather than stopping at the first.
    pub fn validate(&self) -> Result<(), InvalidSimConfig> {
        let mut errors = Vec::new();

        let arena_ok = self.arena.width > 0.0
            && self.arena.height > 0.0
            && self.arena.width.is_finite()
            && self.arena.height.is_finite();
        if !arena_ok {
            errors.push(ConfigError::ArenaNotPositive {
                width: self.arena.width,
                height: self.arena.height,
            });
        }

        for (name, value) in [
            ("max_speed", self.boid.max_speed),
            ("max_force", self.boid.max_force),
        ] {
            if !(value > 0.0) {
                errors.push(ConfigError::LimitNotPositive(name));
            }
        }

        for (name, value) in [
            ("vision_radius", self.boid.vision_radius),
            ("neighbor_radius", self.boid.neighbor_radius),
            ("separation_radius", self.boid.separation_radius),
            ("memory_radius", self.boid.memory_radius),
            ("consumption_radius", self.consumption_radius),
        ] {
            if !(value >= 0.0) {
                errors.push(ConfigError::NegativeRadius(name));
            }
        }

        let radius = self.boid.interaction_radius();
        if !(self.cell_size >= radius) {
            errors.push(ConfigError::CellSmallerThanInteractionRadius {
                cell_size: self.cell_size,
                radius,
            });
        }

        if !(self.cell_size > 0.0 && self.cell_size.is_finite()) {
            errors.push(ConfigError::CellSizeNotPositive(self.cell_size));
        } else if arena_ok {
            if let Err(error) =
                grid_dimensions(self.arena.width, self.arena.height, self.cell_size)
            {
                errors.push(error);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(InvalidSimConfig { errors })
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ArenaNotPositive { width: f32, height: f32 },
    LimitNotPositive(&'static str),
    NegativeRadius(&'static str),
    CellSmallerThanInteractionRadius { cell_size: f32, radius: f32 },
    CellSizeNotPositive(f32),
    TooManyCells { columns: usize, rows: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::ArenaNotPositive { width, height } => {
                write!(f, "arena must have a positive size, got {width}x{height}")
            }
            ConfigError::LimitNotPositive(name) => write!(f, "{name} must be positive"),
            ConfigError::NegativeRadius(name) => write!(f, "{name} must not be negative"),
            ConfigError::CellSmallerThanInteractionRadius { cell_size, radius } => write!(
                f,
                "grid cell size {cell_size} is smaller than the interaction radius {radius}"
            ),
            ConfigError::CellSizeNotPositive(cell_size) => {
                write!(f, "grid cell size must be positive and finite, got {cell_size}")
            }
            ConfigError::TooManyCells { columns, rows } => write!(
                f,
                "a {columns}x{rows} spatial grid exceeds the limit of {MAX_GRID_CELLS} cells"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// All the reasons a [`SimConfig`] was rejected
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidSimConfig {
    pub errors: Vec<ConfigError>,
}

impl From<ConfigError> for InvalidSimConfig {
    fn from(error: ConfigError) -> Self {
        Self {
            errors: alloc::vec![error],
        }
    }
}

impl fmt::Display for InvalidSimConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid simulation config: ")?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidSimConfig {}
