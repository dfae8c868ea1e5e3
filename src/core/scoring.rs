//! Combo multiplier shared by the action games.

use crate::core::constants::{COMBO_HITS_PER_STEP, COMBO_MAX_MULTIPLIER};

/// Multiplier that grows with consecutive hits and resets on a miss or on
/// taking damage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combo {
    /// Consecutive successful hits.
    pub streak: u32,
    /// Best streak this run.
    pub best: u32,
    hits_per_step: u32,
    max_multiplier: u32,
}

impl Default for Combo {
    fn default() -> Self {
        Self::new(COMBO_HITS_PER_STEP, COMBO_MAX_MULTIPLIER)
    }
}

impl Combo {
    pub fn new(hits_per_step: u32, max_multiplier: u32) -> Self {
        Self {
            streak: 0,
            best: 0,
            hits_per_step: hits_per_step.max(1),
            max_multiplier: max_multiplier.max(1),
        }
    }

    /// Current multiplier: 1 at the start, +1 every `hits_per_step` hits.
    pub fn multiplier(&self) -> u32 {
        (1 + self.streak / self.hits_per_step).min(self.max_multiplier)
    }

    /// Register a hit worth `base` points. Returns the points to award, using
    /// the multiplier in effect before this hit.
    pub fn hit(&mut self, base: u32) -> u32 {
        let points = base.saturating_mul(self.multiplier());
        self.streak += 1;
        self.best = self.best.max(self.streak);
        points
    }

    pub fn reset(&mut self) {
        self.streak = 0;
    }
}
