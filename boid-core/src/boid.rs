#[cfg(feature = "std")]
use rand::Rng;

use crate::behavior;
use crate::config::{Arena, BoidConfig, Weights, MEMORY_CAPACITY};
use crate::vector::Vector2D;

/// An RGB colour from the boid palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Colours handed out to boids at creation
pub const PALETTE: [Rgb; 8] = [
    Rgb::new(255, 102, 102), // light red
    Rgb::new(255, 178, 102), // light orange
    Rgb::new(255, 255, 102), // light yellow
    Rgb::new(178, 255, 102), // light green
    Rgb::new(102, 255, 178), // turquoise
    Rgb::new(102, 178, 255), // light blue
    Rgb::new(178, 102, 255), // light purple
    Rgb::new(255, 102, 255), // light pink
];

/// A single boid entity
#[derive(Debug, Clone)]
pub struct Boid {
    pub position: Vector2D,
    pub velocity: Vector2D,
    /// Per-frame accumulator, cleared by [`Boid::update`]
    pub acceleration: Vector2D,
    color: Rgb,
    memory: heapless::Deque<Vector2D, MEMORY_CAPACITY>,
}

impl Boid {
    pub fn new(position: Vector2D, velocity: Vector2D, color: Rgb) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector2D::zero(),
            color,
            memory: heapless::Deque::new(),
        }
    }

    /// Spawns at a whole-number point inside the arena, heading in a random
    /// direction at a speed between 2 and 4.
    #[cfg(feature = "std")]
    pub fn random(width: f32, height: f32) -> Self {
        let mut rng = rand::thread_rng();
        let position = Vector2D::new(
            rng.gen_range(0..=width.max(0.0) as u32) as f32,
            rng.gen_range(0..=height.max(0.0) as u32) as f32,
        );
        let angle = rng.gen_range(0.0..core::f32::consts::TAU);
        let speed = rng.gen_range(2.0..4.0);
        let velocity = Vector2D::new(speed, 0.0).rotate(angle);
        let color = PALETTE[rng.gen_range(0..PALETTE.len())];
        Self::new(position, velocity, color)
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Past positions, oldest first
    pub fn memory(&self) -> impl Iterator<Item = &Vector2D> + '_ {
        self.memory.iter()
    }

    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    pub fn apply_force(&mut self, force: Vector2D) {
        self.acceleration += force;
    }

    /// Weighted sum of every steering behavior for this frame. Reads only;
    /// `neighbors` must not contain this boid.
    pub fn steering_force<'a, I>(
        &self,
        neighbors: I,
        food: &[Vector2D],
        arena: &Arena,
        weights: &Weights,
        config: &BoidConfig,
    ) -> Vector2D
    where
        I: Iterator<Item = &'a Boid> + Clone,
    {
        let mut force = Vector2D::zero();
        force += behavior::alignment(self, neighbors.clone(), config) * weights.alignment;
        force += behavior::cohesion(self, neighbors.clone(), config) * weights.cohesion;
        force += behavior::separation(self, neighbors, config) * weights.separation;
        force += behavior::attraction(self, food, config) * weights.attraction;
        force += behavior::boundary_avoidance(self, arena, config) * weights.boundary_avoidance;
        force += behavior::flow_current(self.position, config) * weights.current;
        force += behavior::memory_avoidance(self, config) * weights.memory;
        force
    }

    /// Adds this frame's steering into `acceleration`. Does not reset it first.
    pub fn apply_behaviors<'a, I>(
        &mut self,
        neighbors: I,
        food: &[Vector2D],
        arena: &Arena,
        weights: &Weights,
        config: &BoidConfig,
    ) where
        I: Iterator<Item = &'a Boid> + Clone,
    {
        let force = self.steering_force(neighbors, food, arena, weights, config);
        self.apply_force(force);
    }

    pub fn update(&mut self, max_speed: f32) {
        self.velocity += self.acceleration;
        self.velocity = self.velocity.limit(max_speed);
        self.position += self.velocity;
        self.acceleration = Vector2D::zero();
        self.remember(self.position);
    }

    fn remember(&mut self, position: Vector2D) {
        if self.memory.is_full() {
            self.memory.pop_front();
        }
        let pushed = self.memory.push_back(position);
        debug_assert!(pushed.is_ok(), "memory full after eviction");
    }

    /// Reflects off the arena walls: the position is clamped onto the wall
    /// and the matching velocity component flips sign.
    pub fn bounce_off_edges(&mut self, width: f32, height: f32) {
        if self.position.x > width {
            self.position.x = width;
            self.velocity.x = -self.velocity.x;
        } else if self.position.x < 0.0 {
            self.position.x = 0.0;
            self.velocity.x = -self.velocity.x;
        }

        if self.position.y > height {
            self.position.y = height;
            self.velocity.y = -self.velocity.y;
        } else if self.position.y < 0.0 {
            self.position.y = 0.0;
            self.velocity.y = -self.velocity.y;
        }
    }

    /// Direction of travel in radians
    pub fn heading(&self) -> f32 {
        self.velocity.heading()
    }

    /// Nose and two tail corners of the triangle drawn for this boid
    pub fn triangle(&self, size: f32) -> [Vector2D; 3] {
        let heading = self.heading();
        let tail = size / 2.0;
        [
            self.position + Vector2D::new(size, 0.0).rotate(heading),
            self.position + Vector2D::new(-tail, tail).rotate(heading),
            self.position + Vector2D::new(-tail, -tail).rotate(heading),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_SPEED;

    const EPSILON: f32 = 1e-4;

    fn boid_at(x: f32, y: f32, vx: f32, vy: f32) -> Boid {
        Boid::new(Vector2D::new(x, y), Vector2D::new(vx, vy), PALETTE[0])
    }

    #[test]
    fn test_boid_creation() {
        let boid = boid_at(10.0, 20.0, 1.0, 1.0);

        assert_eq!(boid.position, Vector2D::new(10.0, 20.0));
        assert_eq!(boid.velocity, Vector2D::new(1.0, 1.0));
        assert_eq!(boid.acceleration, Vector2D::zero());
        assert_eq!(boid.memory_len(), 0);
        assert_eq!(boid.color(), PALETTE[0]);
    }

    #[test]
    fn test_boid_random_inside_arena() {
        for _ in 0..100 {
            let boid = Boid::random(1280.0, 720.0);
            assert!((0.0..=1280.0).contains(&boid.position.x));
            assert!((0.0..=720.0).contains(&boid.position.y));
            let speed = boid.velocity.magnitude();
            assert!((2.0 - EPSILON..4.0 + EPSILON).contains(&speed));
            assert!(PALETTE.contains(&boid.color()));
        }
    }

    #[test]
    fn test_boid_update() {
        let mut boid = boid_at(0.0, 0.0, 1.0, 1.0);
        boid.apply_force(Vector2D::new(0.5, 0.0));

        boid.update(MAX_SPEED);

        assert_eq!(boid.velocity, Vector2D::new(1.5, 1.0));
        assert_eq!(boid.position, Vector2D::new(1.5, 1.0));
        assert_eq!(boid.acceleration, Vector2D::zero());
        assert_eq!(boid.memory().copied().last(), Some(boid.position));
    }

    #[test]
    fn test_update_clamps_speed() {
        let mut boid = boid_at(100.0, 100.0, 3.9, 0.0);
        boid.apply_force(Vector2D::new(10.0, 10.0));

        boid.update(MAX_SPEED);

        assert!(boid.velocity.magnitude() <= MAX_SPEED + EPSILON);
    }

    #[test]
    fn test_update_with_zero_velocity() {
        let mut boid = boid_at(5.0, 5.0, 0.0, 0.0);

        boid.update(MAX_SPEED);

        assert_eq!(boid.velocity, Vector2D::zero());
        assert_eq!(boid.position, Vector2D::new(5.0, 5.0));
    }

    #[test]
    fn test_memory_keeps_most_recent_positions() {
        let mut boid = boid_at(0.0, 0.0, 1.0, 0.0);

        for _ in 0..(MEMORY_CAPACITY + 20) {
            boid.update(MAX_SPEED);
        }

        assert_eq!(boid.memory_len(), MEMORY_CAPACITY);
        let remembered: Vec<f32> = boid.memory().map(|p| p.x).collect();
        let expected: Vec<f32> = (21..=70).map(|x| x as f32).collect();
        assert_eq!(remembered, expected);
    }

    #[test]
    fn test_bounce_off_right_wall() {
        let mut boid = boid_at(1283.0, 300.0, 3.0, 1.0);

        boid.bounce_off_edges(1280.0, 720.0);

        assert_eq!(boid.position.x, 1280.0);
        assert_eq!(boid.velocity.x, -3.0);
        assert_eq!(boid.velocity.y, 1.0);
    }

    #[test]
    fn test_bounce_off_corner() {
        let mut boid = boid_at(-2.0, 725.0, -1.0, 2.0);

        boid.bounce_off_edges(1280.0, 720.0);

        assert_eq!(boid.position, Vector2D::new(0.0, 720.0));
        assert_eq!(boid.velocity, Vector2D::new(1.0, -2.0));
    }

    #[test]
    fn test_inside_arena_does_not_bounce() {
        let mut boid = boid_at(640.0, 360.0, 2.0, -2.0);

        boid.bounce_off_edges(1280.0, 720.0);

        assert_eq!(boid.position, Vector2D::new(640.0, 360.0));
        assert_eq!(boid.velocity, Vector2D::new(2.0, -2.0));
    }

    #[test]
    fn test_apply_behaviors_accumulates() {
        let mut boid = boid_at(640.0, 360.0, 1.0, 0.0);
        let weights = Weights {
            current: 1.0,
            ..Weights::zero()
        };
        let config = BoidConfig::default();
        let arena = Arena::default();

        boid.apply_behaviors(core::iter::empty(), &[], &arena, &weights, &config);
        let once = boid.acceleration;
        boid.apply_behaviors(core::iter::empty(), &[], &arena, &weights, &config);

        assert!(!once.is_zero());
        assert!((boid.acceleration - once * 2.0).magnitude() < EPSILON);
    }

    #[test]
    fn test_triangle_points_along_velocity() {
        let boid = boid_at(100.0, 100.0, 0.0, 3.0);

        let [nose, left, right] = boid.triangle(8.0);

        assert!((nose - Vector2D::new(100.0, 108.0)).magnitude() < EPSILON);
        assert!(left.y < 100.0 && right.y < 100.0);
        assert!((left.x - 100.0 + (right.x - 100.0)).abs() < EPSILON);
    }
}
