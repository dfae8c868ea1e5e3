//! Slicer data structures.

use crate::core::constants::{PORTRAIT_HEIGHT, PORTRAIT_WIDTH};
use crate::core::entity::{Bounds, Entity};
use crate::core::scoring::Combo;
use crate::core::spawner::{edge_position, Edge, Range, SpawnSchedule, Spawner};
use glam::DVec2;
use rand::Rng;

pub const TOSS_GRAVITY: f64 = 900.0;
/// Upward launch speed in px/s.
pub const LAUNCH_SPEED: Range = Range::new(700.0, 900.0);
/// Fraction of the distance to the center covered horizontally per second.
pub const DRIFT_FACTOR: Range = Range::new(0.2, 0.6);
pub const FRUIT_RADIUS: Range = Range::new(22.0, 30.0);
pub const BOMB_RADIUS: f64 = 20.0;
pub const BOMB_CHANCE: f64 = 0.15;
pub const FRUIT_POINTS: u32 = 10;
/// Trail points older than this (seconds) stop cutting.
pub const TRAIL_MAX_AGE: f64 = 0.15;
/// Slice reach as a multiple of the target radius.
pub const SLICE_FORGIVENESS: f64 = 1.15;

pub const SPAWN_SCHEDULE: SpawnSchedule = SpawnSchedule {
    base_interval: 0.9,
    min_interval: 0.35,
    ramp: 0.6,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thrown {
    Fruit,
    Bomb,
}

impl Thrown {
    pub fn sprite(&self) -> &'static str {
        match self {
            Self::Fruit => "fruit",
            Self::Bomb => "bomb",
        }
    }
}

/// One sample of the swipe path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: DVec2,
    /// Seconds since the sample was taken.
    pub age: f64,
}

/// Main game state.
#[derive(Debug, Clone)]
pub struct SlicerGame {
    pub bounds: Bounds,
    pub objects: Vec<Entity<Thrown>>,
    pub trail: Vec<TrailPoint>,
    pub pointer_down: bool,
    pub spawner: Spawner,
    pub combo: Combo,

    // Stats
    pub sliced: u32,
    pub bombs_hit: u32,
    pub dropped: u32,
}

impl Default for SlicerGame {
    fn default() -> Self {
        Self::new()
    }
}

impl SlicerGame {
    pub fn new() -> Self {
        Self {
            bounds: Bounds::new(PORTRAIT_WIDTH, PORTRAIT_HEIGHT),
            objects: Vec::new(),
            trail: Vec::new(),
            pointer_down: false,
            spawner: Spawner::new(SPAWN_SCHEDULE),
            combo: Combo::default(),
            sliced: 0,
            bombs_hit: 0,
            dropped: 0,
        }
    }

    /// Toss a fruit or bomb up from below the bottom edge, drifting toward the
    /// middle so it stays on screen.
    pub fn toss<R: Rng>(&mut self, rng: &mut R, progress: f64) {
        let bomb = rng.gen_bool((BOMB_CHANCE * (1.0 + progress)).min(0.5));
        let (kind, radius) = if bomb {
            (Thrown::Bomb, BOMB_RADIUS)
        } else {
            (Thrown::Fruit, FRUIT_RADIUS.sample(rng))
        };
        let pos = edge_position(rng, &self.bounds, Edge::Bottom, radius);
        let vel = DVec2::new(
            (self.bounds.width / 2.0 - pos.x) * DRIFT_FACTOR.sample(rng),
            -LAUNCH_SPEED.sample(rng),
        );
        let points = if bomb { 0 } else { FRUIT_POINTS };
        self.objects
            .push(Entity::new(kind, pos, vel, radius).with_points(points));
    }

    /// Record a swipe sample.
    pub fn push_trail(&mut self, pos: DVec2) {
        self.trail.push(TrailPoint { pos, age: 0.0 });
    }

    /// Age the trail and forget samples too old to cut.
    pub fn age_trail(&mut self, dt: f64) {
        for point in self.trail.iter_mut() {
            point.age += dt;
        }
        self.trail.retain(|p| p.age <= TRAIL_MAX_AGE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_toss_launches_upward_from_below() {
        let mut game = SlicerGame::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..25 {
            game.toss(&mut rng, 0.0);
        }
        for obj in &game.objects {
            assert!(obj.pos.y > game.bounds.height);
            assert!(obj.vel.y < 0.0);
        }
        assert!(game.objects.iter().any(|o| o.kind == Thrown::Fruit));
    }

    #[test]
    fn test_trail_expires() {
        let mut game = SlicerGame::new();
        game.push_trail(DVec2::new(10.0, 10.0));
        game.age_trail(0.1);
        game.push_trail(DVec2::new(20.0, 10.0));
        assert_eq!(game.trail.len(), 2);
        game.age_trail(0.1);
        assert_eq!(game.trail.len(), 1);
        assert_eq!(game.trail[0].pos.x, 20.0);
    }
}
