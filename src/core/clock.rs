//! Simulation clock and countdown timer.
//!
//! The simulation clock turns host frame timestamps into a clamped `dt`; the
//! countdown fires whole-second ticks from wall-clock time. Both are paused and
//! resumed together by the engine, and both re-anchor on resume so the paused
//! interval never leaks into the first step back.

/// Variable-timestep clock with a maximum step.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    max_step_ms: u64,
    last_frame_ms: Option<u64>,
    /// Simulated time, in milliseconds, since the clock was started.
    pub simulated_ms: u64,
    running: bool,
}

impl SimulationClock {
    pub fn new(max_step_ms: u64) -> Self {
        Self {
            max_step_ms: max_step_ms.max(1),
            last_frame_ms: None,
            simulated_ms: 0,
            running: false,
        }
    }

    pub fn max_step_ms(&self) -> u64 {
        self.max_step_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start from zero at `now_ms`.
    pub fn start(&mut self, now_ms: u64) {
        self.simulated_ms = 0;
        self.last_frame_ms = Some(now_ms);
        self.running = true;
    }

    /// Stop stepping. The last frame time is kept only until `resume`.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Resume without a time jump: the next `dt` is measured from `now_ms`.
    pub fn resume(&mut self, now_ms: u64) {
        self.last_frame_ms = Some(now_ms);
        self.running = true;
    }

    /// Advance to `now_ms`. Returns the clamped step in seconds, or `None`
    /// while paused. Timestamps going backwards yield a zero step.
    pub fn advance(&mut self, now_ms: u64) -> Option<f64> {
        if !self.running {
            return None;
        }
        let last = self.last_frame_ms.unwrap_or(now_ms);
        let step_ms = now_ms.saturating_sub(last).min(self.max_step_ms);
        self.last_frame_ms = Some(now_ms);
        self.simulated_ms += step_ms;
        Some(step_ms as f64 / 1000.0)
    }
}

/// One-second interval timer anchored to wall-clock time.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    interval_ms: u64,
    next_fire_ms: Option<u64>,
}

impl CountdownTimer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            next_fire_ms: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn is_running(&self) -> bool {
        self.next_fire_ms.is_some()
    }

    /// (Re)arm so the first tick fires one interval after `now_ms`.
    pub fn start(&mut self, now_ms: u64) {
        self.next_fire_ms = now_ms.checked_add(self.interval_ms);
    }

    pub fn stop(&mut self) {
        self.next_fire_ms = None;
    }

    /// Number of whole intervals elapsed up to `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> u32 {
        let Some(mut next) = self.next_fire_ms else {
            return 0;
        };
        let mut fired = 0;
        while now_ms >= next {
            fired += 1;
            match next.checked_add(self.interval_ms) {
                Some(n) => next = n,
                None => {
                    // Past the end of the clock: nothing more can fire
                    self.next_fire_ms = None;
                    return fired;
                }
            }
        }
        self.next_fire_ms = Some(next);
        fired
    }
}
