//! Moving game objects and the playfield they live in.

use glam::DVec2;

/// Axis-aligned playfield, origin top-left, y pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when a circle lies entirely outside the field by more than `margin`.
    pub fn is_outside(&self, pos: DVec2, radius: f64, margin: f64) -> bool {
        let reach = radius + margin;
        pos.x < -reach
            || pos.x > self.width + reach
            || pos.y < -reach
            || pos.y > self.height + reach
    }
}

/// A simulated object: position, velocity, size, a game-specific kind tag, and
/// how much it is worth or how much punishment it can take.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<K> {
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    pub kind: K,
    /// Hits left before the entity is destroyed.
    pub hp: u32,
    /// Base points when consumed.
    pub points: u32,
    /// Cleared by collision consumption; removed at the end of the step.
    pub alive: bool,
}

impl<K> Entity<K> {
    pub fn new(kind: K, pos: DVec2, vel: DVec2, radius: f64) -> Self {
        Self {
            pos,
            vel,
            radius,
            kind,
            hp: 1,
            points: 0,
            alive: true,
        }
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp.max(1);
        self
    }

    /// Linear integration with optional constant downward acceleration.
    pub fn integrate(&mut self, dt: f64, gravity: f64) {
        self.vel.y += gravity * dt;
        self.pos += self.vel * dt;
    }

    /// Apply one hit. Returns true when the entity was destroyed by it.
    pub fn damage(&mut self, amount: u32) -> bool {
        self.hp = self.hp.saturating_sub(amount);
        if self.hp == 0 {
            self.alive = false;
        }
        !self.alive
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite() && self.radius.is_finite()
    }
}

/// Advance every entity by `dt`.
pub fn integrate_all<K>(entities: &mut [Entity<K>], dt: f64, gravity: f64) {
    for entity in entities.iter_mut() {
        entity.integrate(dt, gravity);
    }
}

/// Drop consumed entities and those that left the field by `margin`.
/// Returns the ones removed for leaving the field (not the consumed ones).
pub fn cull<K>(entities: &mut Vec<Entity<K>>, bounds: &Bounds, margin: f64) -> Vec<Entity<K>> {
    let mut escaped = Vec::new();
    let mut kept = Vec::with_capacity(entities.len());
    for entity in entities.drain(..) {
        if !entity.alive {
            continue;
        }
        if bounds.is_outside(entity.pos, entity.radius, margin) {
            escaped.push(entity);
        } else {
            kept.push(entity);
        }
    }
    *entities = kept;
    escaped
}

/// Keep a circular actor fully inside the field. Velocity components pushing
/// further out are zeroed. Returns true when any clamping happened.
pub fn clamp_to_bounds(pos: &mut DVec2, vel: &mut DVec2, radius: f64, bounds: &Bounds) -> bool {
    let mut clamped = false;
    let min = DVec2::splat(radius);
    let max = DVec2::new(bounds.width - radius, bounds.height - radius);

    if pos.x < min.x {
        pos.x = min.x;
        vel.x = vel.x.max(0.0);
        clamped = true;
    } else if pos.x > max.x {
        pos.x = max.x;
        vel.x = vel.x.min(0.0);
        clamped = true;
    }
    if pos.y < min.y {
        pos.y = min.y;
        vel.y = vel.y.max(0.0);
        clamped = true;
    } else if pos.y > max.y {
        pos.y = max.y;
        vel.y = vel.y.min(0.0);
        clamped = true;
    }
    clamped
}

/// Move `current` toward `target` by at most `max_delta`.
pub fn approach(current: f64, target: f64, max_delta: f64) -> f64 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + max_delta.copysign(delta)
    }
}
