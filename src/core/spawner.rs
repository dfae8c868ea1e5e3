//! Spawn cadence with a bounded difficulty ramp.

use crate::core::constants::MAX_SPAWNS_PER_STEP;
use crate::core::entity::Bounds;
use glam::DVec2;
use rand::Rng;

/// Inclusive range sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    /// Scale both ends, e.g. to speed things up as difficulty ramps.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.min * factor, self.max * factor)
    }
}

/// How the interval between spawns shrinks with progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnSchedule {
    /// Seconds between spawns at zero progress.
    pub base_interval: f64,
    /// Floor the interval never goes below.
    pub min_interval: f64,
    /// Fraction of `base_interval` removed at full progress, in [0, 1].
    pub ramp: f64,
}

impl SpawnSchedule {
    /// Interval for a progress fraction. Non-increasing in `progress` and never
    /// below `min_interval`.
    pub fn interval(&self, progress: f64) -> f64 {
        let p = progress.clamp(0.0, 1.0);
        let ramp = self.ramp.clamp(0.0, 1.0);
        (self.base_interval * (1.0 - ramp * p)).max(self.min_interval)
    }
}

/// Accumulates elapsed time and reports how many entities are due.
#[derive(Debug, Clone)]
pub struct Spawner {
    pub schedule: SpawnSchedule,
    accumulated: f64,
}

impl Spawner {
    pub fn new(schedule: SpawnSchedule) -> Self {
        Self {
            schedule,
            accumulated: 0.0,
        }
    }

    /// Start with `seconds` already banked, e.g. to spawn on the first frame.
    pub fn primed(schedule: SpawnSchedule, seconds: f64) -> Self {
        Self {
            schedule,
            accumulated: seconds,
        }
    }

    /// Advance by `dt` seconds at the given progress. Returns the number of
    /// spawns due, capped per step.
    pub fn tick(&mut self, dt: f64, progress: f64) -> u32 {
        self.accumulated += dt;
        let interval = self.schedule.interval(progress).max(f64::EPSILON);
        let mut due = 0;
        while self.accumulated >= interval && due < MAX_SPAWNS_PER_STEP {
            self.accumulated -= interval;
            due += 1;
        }
        if due == MAX_SPAWNS_PER_STEP {
            // Drop the backlog instead of bursting next frame
            self.accumulated = self.accumulated.min(interval);
        }
        due
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

/// Edge of the playfield an entity enters from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Random point just outside `edge`, keeping `radius` clear of the corners.
pub fn edge_position<R: Rng>(rng: &mut R, bounds: &Bounds, edge: Edge, radius: f64) -> DVec2 {
    let along_x = Range::new(radius, (bounds.width - radius).max(radius));
    let along_y = Range::new(radius, (bounds.height - radius).max(radius));
    match edge {
        Edge::Top => DVec2::new(along_x.sample(rng), -radius),
        Edge::Bottom => DVec2::new(along_x.sample(rng), bounds.height + radius),
        Edge::Left => DVec2::new(-radius, along_y.sample(rng)),
        Edge::Right => DVec2::new(bounds.width + radius, along_y.sample(rng)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const SCHEDULE: SpawnSchedule = SpawnSchedule {
        base_interval: 1.0,
        min_interval: 0.3,
        ramp: 0.9,
    };

    #[test]
    fn test_interval_monotonic_and_bounded() {
        let mut last = f64::INFINITY;
        for i in 0..=20 {
            let interval = SCHEDULE.interval(i as f64 / 20.0);
            assert!(interval <= last);
            assert!(interval >= SCHEDULE.min_interval);
            last = interval;
        }
        assert_eq!(SCHEDULE.interval(1.0), 0.3);
        assert_eq!(SCHEDULE.interval(5.0), 0.3);
        assert_eq!(SCHEDULE.interval(-1.0), 1.0);
    }

    #[test]
    fn test_tick_accumulates() {
        let mut spawner = Spawner::new(SCHEDULE);
        assert_eq!(spawner.tick(0.5, 0.0), 0);
        assert_eq!(spawner.tick(0.5, 0.0), 1);
        assert_eq!(spawner.tick(0.2, 0.0), 0);
    }

    #[test]
    fn test_tick_caps_bursts() {
        let mut spawner = Spawner::new(SCHEDULE);
        assert_eq!(spawner.tick(100.0, 1.0), MAX_SPAWNS_PER_STEP);
        // Backlog dropped, at most one more next frame
        assert!(spawner.tick(0.0, 1.0) <= 1);
    }

    #[test]
    fn test_primed_spawns_immediately() {
        let mut spawner = Spawner::primed(SCHEDULE, 1.0);
        assert_eq!(spawner.tick(0.0, 0.0), 1);
    }

    #[test]
    fn test_edge_positions_outside_field() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let bounds = Bounds::new(100.0, 50.0);
        for _ in 0..50 {
            let top = edge_position(&mut rng, &bounds, Edge::Top, 5.0);
            assert_eq!(top.y, -5.0);
            assert!(top.x >= 5.0 && top.x <= 95.0);
            let right = edge_position(&mut rng, &bounds, Edge::Right, 5.0);
            assert_eq!(right.x, 105.0);
            assert!(right.y >= 5.0 && right.y <= 45.0);
        }
    }

    #[test]
    fn test_range_sample() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let range = Range::new(2.0, 4.0);
        for _ in 0..100 {
            let v = range.sample(&mut rng);
            assert!((2.0..=4.0).contains(&v));
        }
        assert_eq!(Range::new(3.0, 3.0).sample(&mut rng), 3.0);
        assert_eq!(range.scaled(2.0), Range::new(4.0, 8.0));
    }
}
