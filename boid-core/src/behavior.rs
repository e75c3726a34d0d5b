//! Steering behaviors. Every function returns a force for a single boid and
//! degrades to the zero vector when it has nothing to react to.

use crate::boid::Boid;
use crate::config::{Arena, BoidConfig};
use crate::vector::{sin_cos, Vector2D};

/// The steering primitive: head for `desired` at full speed, correcting the
/// current velocity by no more than `max_force`.
pub fn steer(desired: Vector2D, velocity: Vector2D, config: &BoidConfig) -> Vector2D {
    let desired = desired.scale_to_length(config.max_speed);
    (desired - velocity).limit(config.max_force)
}

/// Sum of `offset / distance²` for every point closer than `radius`, i.e. a
/// unit vector away from each point weighted by how close it is.
fn repulsion<'a, I>(position: Vector2D, points: I, radius: f32) -> (Vector2D, usize)
where
    I: Iterator<Item = &'a Vector2D>,
{
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for point in points {
        let distance = position.distance(point);
        if distance < radius {
            if distance > 0.0 {
                sum += (position - *point) / (distance * distance);
            }
            count += 1;
        }
    }

    (sum, count)
}

pub fn alignment<'a, I>(boid: &Boid, others: I, config: &BoidConfig) -> Vector2D
where
    I: Iterator<Item = &'a Boid>,
{
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for other in others {
        if boid.position.distance(&other.position) < config.neighbor_radius {
            sum += other.velocity;
            count += 1;
        }
    }

    if count > 0 {
        steer(sum / count as f32, boid.velocity, config)
    } else {
        Vector2D::zero()
    }
}

pub fn cohesion<'a, I>(boid: &Boid, others: I, config: &BoidConfig) -> Vector2D
where
    I: Iterator<Item = &'a Boid>,
{
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for other in others {
        if boid.position.distance(&other.position) < config.neighbor_radius {
            sum += other.position;
            count += 1;
        }
    }

    if count > 0 {
        let center = sum / count as f32;
        steer(center - boid.position, boid.velocity, config)
    } else {
        Vector2D::zero()
    }
}

pub fn separation<'a, I>(boid: &Boid, others: I, config: &BoidConfig) -> Vector2D
where
    I: Iterator<Item = &'a Boid>,
{
    let (sum, count) = repulsion(
        boid.position,
        others.map(|other| &other.position),
        config.separation_radius,
    );

    if count > 0 {
        steer(sum / count as f32, boid.velocity, config)
    } else {
        Vector2D::zero()
    }
}

/// Steers toward the nearest food point, if there is one
pub fn attraction(boid: &Boid, food: &[Vector2D], config: &BoidConfig) -> Vector2D {
    let nearest = food.iter().min_by(|a, b| {
        boid.position
            .distance_squared(a)
            .total_cmp(&boid.position.distance_squared(b))
    });

    match nearest {
        Some(target) => steer(*target - boid.position, boid.velocity, config),
        None => Vector2D::zero(),
    }
}

/// Pushes away from any wall closer than `vision_radius`, per axis
pub fn boundary_avoidance(boid: &Boid, arena: &Arena, config: &BoidConfig) -> Vector2D {
    let mut push = Vector2D::zero();

    if boid.position.x < config.vision_radius {
        push.x += config.max_speed;
    } else if boid.position.x > arena.width - config.vision_radius {
        push.x -= config.max_speed;
    }

    if boid.position.y < config.vision_radius {
        push.y += config.max_speed;
    } else if boid.position.y > arena.height - config.vision_radius {
        push.y -= config.max_speed;
    }

    if push.is_zero() {
        Vector2D::zero()
    } else {
        steer(push, boid.velocity, config)
    }
}

/// Ambient drift from the fixed field `(sin(y / scale), cos(x / scale))`.
/// Not a steering correction, so it is neither relative to velocity nor clamped.
pub fn flow_current(position: Vector2D, config: &BoidConfig) -> Vector2D {
    let (sin_y, _) = sin_cos(position.y / config.current_scale);
    let (_, cos_x) = sin_cos(position.x / config.current_scale);
    Vector2D::new(sin_y, cos_x).scale_to_length(config.current_strength)
}

/// Steers away from the boid's own recent positions
pub fn memory_avoidance(boid: &Boid, config: &BoidConfig) -> Vector2D {
    let (sum, _) = repulsion(boid.position, boid.memory(), config.memory_radius);

    if sum.is_zero() {
        Vector2D::zero()
    } else {
        steer(sum, boid.velocity, config)
    }
}
