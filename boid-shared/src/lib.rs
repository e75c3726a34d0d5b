#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Represents a 2D position in arena coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another position
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        libm::sqrtf(dx * dx + dy * dy)
    }
}

/// Behavior weights as set by the control panel sliders, each in [0, 5]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeightSettings {
    pub alignment: f32,
    pub cohesion: f32,
    pub separation: f32,
    pub attraction: f32,
    pub boundary_avoidance: f32,
    pub current: f32,
    pub memory: f32,
}

impl Default for WeightSettings {
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

/// A food point dropped at the start of a given frame, standing in for a mouse click
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FoodDrop {
    #[serde(default)]
    pub frame: u64,
    pub position: Position,
}

/// Simulation configuration as read from a settings file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationSettings {
    pub boid_count: usize,
    pub width: f32,
    pub height: f32,
    pub cell_size: f32,
    pub weights: WeightSettings,
    pub food: Vec<FoodDrop>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            boid_count: 350,
            width: 1280.0,
            height: 720.0,
            cell_size: 120.0,
            weights: WeightSettings::default(),
            food: Vec::new(),
        }
    }
}

/// What a renderer needs to draw one boid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoidSnapshot {
    pub position: Position,
    /// radians, measured from the +x axis
    pub heading: f32,
    pub color: [u8; 3],
}

/// State of the whole arena after a frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub boids: Vec<BoidSnapshot>,
    pub food: Vec<Position>,
}

/// Summary printed at the end of a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub boid_count: usize,
    pub food_remaining: usize,
    pub food_consumed: usize,
    pub mean_speed: f32,
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_distance() {
        let p1 = Position::new(0.0, 0.0);
        let p2 = Position::new(3.0, 4.0);
        assert_eq!(p1.distance_to(&p2), 5.0);
    }

    #[test]
    fn test_settings_fill_missing_fields() {
        let settings: SimulationSettings =
            serde_json::from_str(r#"{"boid_count": 20, "weights": {"memory": 2.0}}"#).unwrap();

        assert_eq!(settings.boid_count, 20);
        assert_eq!(settings.width, 1280.0);
        assert_eq!(settings.weights.memory, 2.0);
        assert_eq!(settings.weights.separation, 1.5);
        assert!(settings.food.is_empty());
    }

    #[test]
    fn test_food_drop_defaults_to_first_frame() {
        let drop: FoodDrop =
            serde_json::from_str(r#"{"position": {"x": 10.0, "y": 20.0}}"#).unwrap();
        assert_eq!(drop.frame, 0);
        assert_eq!(drop.position, Position::new(10.0, 20.0));
    }

    #[test]
    fn test_frame_snapshot_json_shape() {
        let snapshot = FrameSnapshot {
            frame: 3,
            boids: vec![BoidSnapshot {
                position: Position::new(1.0, 2.0),
                heading: 0.5,
                color: [255, 102, 102],
            }],
            food: vec![Position::new(5.0, 6.0)],
        };

        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["frame"], 3);
        assert_eq!(value["boids"][0]["color"][1], 102);
        assert_eq!(value["food"][0]["y"], 6.0);
    }
}
