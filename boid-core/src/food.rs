use alloc::vec::Vec;

use crate::vector::Vector2D;

/// A food point that was eaten, and the first boid (in boid order) close enough to eat it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Consumption {
    pub food: Vector2D,
    pub boid: usize,
}

/// Attractor points placed by clicks and removed when a boid reaches them
#[derive(Debug, Clone, Default)]
pub struct FoodRegistry {
    points: Vec<Vector2D>,
}

impl FoodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends without deduplication
    pub fn add(&mut self, point: Vector2D) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Vector2D] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Removes every food point that lies strictly within `radius` of any
    /// position. Claims are decided for the whole registry first and applied
    /// afterwards, so each point is checked exactly once and removed at most once.
    pub fn consume_near(&mut self, positions: &[Vector2D], radius: f32) -> Vec<Consumption> {
        let radius_squared = radius * radius;

        let claims: Vec<Option<usize>> = self
            .points
            .iter()
            .map(|food| {
                positions
                    .iter()
                    .position(|p| p.distance_squared(food) < radius_squared)
            })
            .collect();

        let consumed: Vec<Consumption> = self
            .points
            .iter()
            .zip(claims.iter())
            .filter_map(|(food, claim)| claim.map(|boid| Consumption { food: *food, boid }))
            .collect();

        if !consumed.is_empty() {
            let mut claims = claims.into_iter();
            self.points
                .retain(|_| matches!(claims.next(), Some(None)));
        }

        consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_keeps_duplicates_in_order() {
        let mut food = FoodRegistry::new();
        food.add(Vector2D::new(1.0, 1.0));
        food.add(Vector2D::new(1.0, 1.0));
        food.add(Vector2D::new(9.0, 9.0));

        assert_eq!(food.len(), 3);
        assert_eq!(food.points()[2], Vector2D::new(9.0, 9.0));
    }

    #[test]
    fn test_consume_removes_only_reached_food() {
        let mut food = FoodRegistry::new();
        food.add(Vector2D::new(100.0, 100.0));
        food.add(Vector2D::new(500.0, 500.0));
        food.add(Vector2D::new(103.0, 104.0));

        let consumed = food.consume_near(&[Vector2D::new(102.0, 101.0)], 5.0);

        assert_eq!(consumed.len(), 2);
        assert_eq!(food.points(), &[Vector2D::new(500.0, 500.0)]);
    }

    #[test]
    fn test_consume_radius_is_exclusive() {
        let mut food = FoodRegistry::new();
        food.add(Vector2D::new(105.0, 100.0));

        let consumed = food.consume_near(&[Vector2D::new(100.0, 100.0)], 5.0);

        assert!(consumed.is_empty());
        assert_eq!(food.len(), 1);
    }

    #[test]
    fn test_contested_food_claimed_once_by_first_boid() {
        let mut food = FoodRegistry::new();
        food.add(Vector2D::new(50.0, 50.0));
        let boids = [
            Vector2D::new(300.0, 300.0),
            Vector2D::new(51.0, 50.0),
            Vector2D::new(50.0, 52.0),
        ];

        let consumed = food.consume_near(&boids, 5.0);

        assert_eq!(
            consumed,
            vec![Consumption {
                food: Vector2D::new(50.0, 50.0),
                boid: 1
            }]
        );
        assert!(food.is_empty());
    }

    #[test]
    fn test_adjacent_duplicates_both_consumed() {
        let mut food = FoodRegistry::new();
        for _ in 0..3 {
            food.add(Vector2D::new(10.0, 10.0));
        }

        let consumed = food.consume_near(&[Vector2D::new(10.0, 10.0)], 5.0);

        assert_eq!(consumed.len(), 3);
        assert!(food.is_empty());
    }

    #[test]
    fn test_consume_with_no_boids() {
        let mut food = FoodRegistry::new();
        food.add(Vector2D::new(10.0, 10.0));

        assert!(food.consume_near(&[], 5.0).is_empty());
        assert_eq!(food.len(), 1);
    }
}
