//! Shooter data structures.

use crate::core::constants::{PORTRAIT_HEIGHT, PORTRAIT_WIDTH};
use crate::core::entity::{Bounds, Entity};
use crate::core::scoring::Combo;
use crate::core::spawner::{edge_position, Edge, Range, SpawnSchedule, Spawner};
use glam::DVec2;
use rand::Rng;

pub const SHIP_RADIUS: f64 = 18.0;
pub const SHIP_OFFSET: f64 = 60.0;
pub const SHIP_SPEED: f64 = 700.0;
pub const BULLET_RADIUS: f64 = 4.0;
pub const BULLET_SPEED: f64 = 650.0;
/// Seconds between shots.
pub const FIRE_COOLDOWN: f64 = 0.22;
pub const ASTEROID_SPEED: Range = Range::new(60.0, 140.0);
/// Sideways drift in px/s.
pub const ASTEROID_DRIFT: Range = Range::new(-30.0, 30.0);

pub const SPAWN_SCHEDULE: SpawnSchedule = SpawnSchedule {
    base_interval: 1.1,
    min_interval: 0.35,
    ramp: 0.65,
};

/// Asteroid size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rock {
    Small,
    Medium,
    Large,
}

impl Rock {
    pub fn radius_range(&self) -> Range {
        match self {
            Self::Small => Range::new(14.0, 18.0),
            Self::Medium => Range::new(22.0, 28.0),
            Self::Large => Range::new(32.0, 36.0),
        }
    }

    pub fn hp(&self) -> u32 {
        match self {
            Self::Small => 1,
            Self::Medium => 2,
            Self::Large => 3,
        }
    }

    pub fn points(&self) -> u32 {
        10 * self.hp()
    }

    pub fn sprite(&self) -> &'static str {
        match self {
            Self::Small => "asteroid_small",
            Self::Medium => "asteroid_medium",
            Self::Large => "asteroid_large",
        }
    }
}

/// A player projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bullet;

/// Main game state.
#[derive(Debug, Clone)]
pub struct ShooterGame {
    pub bounds: Bounds,
    pub ship: DVec2,
    pub target_x: f64,
    pub bullets: Vec<Entity<Bullet>>,
    pub asteroids: Vec<Entity<Rock>>,
    pub spawner: Spawner,
    pub combo: Combo,

    /// Seconds until the gun can fire again.
    pub cooldown: f64,
    pub auto_fire: bool,
    /// Single shot requested since the last step.
    pub fire_queued: bool,

    // Stats
    pub destroyed: u32,
    pub shots_fired: u32,
}

impl Default for ShooterGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ShooterGame {
    pub fn new() -> Self {
        let bounds = Bounds::new(PORTRAIT_WIDTH, PORTRAIT_HEIGHT);
        let ship = DVec2::new(bounds.width / 2.0, bounds.height - SHIP_OFFSET);
        Self {
            bounds,
            ship,
            target_x: ship.x,
            bullets: Vec::new(),
            asteroids: Vec::new(),
            spawner: Spawner::primed(SPAWN_SCHEDULE, SPAWN_SCHEDULE.base_interval),
            combo: Combo::default(),
            cooldown: 0.0,
            auto_fire: false,
            fire_queued: false,
            destroyed: 0,
            shots_fired: 0,
        }
    }

    /// Spawn an asteroid at the top edge. Large rocks get more common and
    /// everything falls faster as the run progresses.
    pub fn spawn_asteroid<R: Rng>(&mut self, rng: &mut R, progress: f64) {
        let roll: f64 = rng.gen();
        let large_chance = 0.15 + 0.2 * progress;
        let rock = if roll < large_chance {
            Rock::Large
        } else if roll < large_chance + 0.35 {
            Rock::Medium
        } else {
            Rock::Small
        };
        let radius = rock.radius_range().sample(rng);
        let pos = edge_position(rng, &self.bounds, Edge::Top, radius);
        let vel = DVec2::new(
            ASTEROID_DRIFT.sample(rng),
            ASTEROID_SPEED.scaled(1.0 + progress).sample(rng),
        );
        self.asteroids.push(
            Entity::new(rock, pos, vel, radius)
                .with_hp(rock.hp())
                .with_points(rock.points()),
        );
    }

    pub fn fire(&mut self) {
        let muzzle = self.ship - DVec2::new(0.0, SHIP_RADIUS);
        self.bullets.push(Entity::new(
            Bullet,
            muzzle,
            DVec2::new(0.0, -BULLET_SPEED),
            BULLET_RADIUS,
        ));
        self.cooldown = FIRE_COOLDOWN;
        self.shots_fired += 1;
    }
}
