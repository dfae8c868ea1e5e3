//! Catcher data structures.

use crate::core::constants::{PORTRAIT_HEIGHT, PORTRAIT_WIDTH};
use crate::core::entity::{Bounds, Entity};
use crate::core::spawner::{edge_position, Edge, Range, SpawnSchedule, Spawner};
use glam::DVec2;
use rand::Rng;

pub const BASKET_RADIUS: f64 = 28.0;
/// Distance of the basket center above the bottom edge.
pub const BASKET_OFFSET: f64 = 48.0;
/// Horizontal basket speed in px/s.
pub const BASKET_SPEED: f64 = 900.0;
/// Extra downward acceleration applied to falling objects.
pub const FALL_GRAVITY: f64 = 60.0;
pub const FALL_SPEED: Range = Range::new(140.0, 220.0);
pub const BOMB_CHANCE: f64 = 0.2;
pub const CRYSTAL_CHANCE: f64 = 0.1;

pub const SPAWN_SCHEDULE: SpawnSchedule = SpawnSchedule {
    base_interval: 0.8,
    min_interval: 0.25,
    ramp: 0.7,
};

/// What is falling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Falling {
    Gem,
    Crystal,
    Bomb,
}

impl Falling {
    pub fn points(&self) -> u32 {
        match self {
            Self::Gem => 1,
            Self::Crystal => 3,
            Self::Bomb => 0,
        }
    }

    pub fn radius(&self) -> f64 {
        match self {
            Self::Gem => 14.0,
            Self::Crystal => 12.0,
            Self::Bomb => 16.0,
        }
    }

    pub fn sprite(&self) -> &'static str {
        match self {
            Self::Gem => "gem",
            Self::Crystal => "crystal",
            Self::Bomb => "bomb",
        }
    }
}

/// Main game state.
#[derive(Debug, Clone)]
pub struct CatcherGame {
    pub bounds: Bounds,
    pub basket: DVec2,
    /// Pointer x the basket is moving toward.
    pub target_x: f64,
    pub objects: Vec<Entity<Falling>>,
    pub spawner: Spawner,

    // Stats
    pub caught: u32,
    pub bombs_hit: u32,
    pub missed: u32,
}

impl Default for CatcherGame {
    fn default() -> Self {
        Self::new()
    }
}

impl CatcherGame {
    pub fn new() -> Self {
        let bounds = Bounds::new(PORTRAIT_WIDTH, PORTRAIT_HEIGHT);
        let basket = DVec2::new(bounds.width / 2.0, bounds.height - BASKET_OFFSET);
        Self {
            bounds,
            basket,
            target_x: basket.x,
            objects: Vec::new(),
            spawner: Spawner::new(SPAWN_SCHEDULE),
            caught: 0,
            bombs_hit: 0,
            missed: 0,
        }
    }

    /// Spawn a random object at the top edge. Later in the run objects fall
    /// faster and bombs become more likely.
    pub fn spawn_object<R: Rng>(&mut self, rng: &mut R, progress: f64) {
        let roll: f64 = rng.gen();
        let bomb_chance = BOMB_CHANCE * (1.0 + progress * 0.5);
        let kind = if roll < bomb_chance {
            Falling::Bomb
        } else if roll < bomb_chance + CRYSTAL_CHANCE {
            Falling::Crystal
        } else {
            Falling::Gem
        };
        let pos = edge_position(rng, &self.bounds, Edge::Top, kind.radius());
        let speed = FALL_SPEED.scaled(1.0 + progress).sample(rng);
        self.objects.push(
            Entity::new(kind, pos, DVec2::new(0.0, speed), kind.radius()).with_points(kind.points()),
        );
    }

    /// Place an object directly over the basket.
    pub fn drop_on_basket(&mut self, kind: Falling) {
        let pos = self.basket - DVec2::new(0.0, 1.0);
        self.objects
            .push(Entity::new(kind, pos, DVec2::ZERO, kind.radius()).with_points(kind.points()));
    }
}
