//! Runner data structures.

use crate::core::constants::{LANDSCAPE_HEIGHT, LANDSCAPE_WIDTH};
use crate::core::entity::{Bounds, Entity};
use crate::core::spawner::{edge_position, Edge, Range, SpawnSchedule, Spawner};
use glam::DVec2;
use rand::Rng;

pub const RUNNER_X: f64 = 120.0;
pub const RUNNER_RADIUS: f64 = 18.0;
pub const RUNNER_GRAVITY: f64 = 1100.0;
/// Upward speed set by one jetpack burst.
pub const JETPACK_IMPULSE: f64 = 420.0;
pub const DEBRIS_SPEED: Range = Range::new(180.0, 240.0);
pub const DEBRIS_RADIUS: Range = Range::new(12.0, 26.0);
/// Speed gain at full progress, as a fraction of the base speed.
pub const SPEED_RAMP: f64 = 0.8;

pub const SPAWN_SCHEDULE: SpawnSchedule = SpawnSchedule {
    base_interval: 1.2,
    min_interval: 0.45,
    ramp: 0.6,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debris;

/// Main game state.
#[derive(Debug, Clone)]
pub struct RunnerGame {
    pub bounds: Bounds,
    pub pos: DVec2,
    pub vel: DVec2,
    pub debris: Vec<Entity<Debris>>,
    pub spawner: Spawner,
    /// Jetpack bursts requested since the last step.
    pub pending_bursts: u32,
    pub grounded: bool,

    // Stats
    pub dodged: u32,
    pub collisions: u32,
}

impl Default for RunnerGame {
    fn default() -> Self {
        Self::new()
    }
}

impl RunnerGame {
    pub fn new() -> Self {
        let bounds = Bounds::new(LANDSCAPE_WIDTH, LANDSCAPE_HEIGHT);
        Self {
            bounds,
            pos: DVec2::new(RUNNER_X, bounds.height - RUNNER_RADIUS),
            vel: DVec2::ZERO,
            debris: Vec::new(),
            spawner: Spawner::new(SPAWN_SCHEDULE),
            pending_bursts: 0,
            grounded: true,
            dodged: 0,
            collisions: 0,
        }
    }

    /// Debris enters from the right edge at a random height. Each piece is
    /// worth one point once it scrolls past the runner.
    pub fn spawn_debris<R: Rng>(&mut self, rng: &mut R, progress: f64) {
        let radius = DEBRIS_RADIUS.sample(rng);
        let pos = edge_position(rng, &self.bounds, Edge::Right, radius);
        let speed = DEBRIS_SPEED.scaled(1.0 + SPEED_RAMP * progress).sample(rng);
        self.debris
            .push(Entity::new(Debris, pos, DVec2::new(-speed, 0.0), radius).with_points(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_runner_starts_on_ground() {
        let game = RunnerGame::new();
        assert_eq!(game.pos.y, LANDSCAPE_HEIGHT - RUNNER_RADIUS);
        assert!(game.grounded);
    }

    #[test]
    fn test_debris_scrolls_left_faster_later() {
        let mut game = RunnerGame::new();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        game.spawn_debris(&mut rng, 1.0);
        let debris = &game.debris[0];
        assert!(debris.pos.x > game.bounds.width);
        assert!(-debris.vel.x >= DEBRIS_SPEED.min * (1.0 + SPEED_RAMP));
    }
}
