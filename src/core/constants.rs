// Frame pacing
pub const FRAME_MS: u64 = 16; // ~60 FPS host refresh
pub const MAX_STEP_MS: u64 = 50; // dt clamp after tab-suspend or lag
pub const COUNTDOWN_INTERVAL_MS: u64 = 1000;

// Playfields (logical pixels, origin top-left, y down)
pub const PORTRAIT_WIDTH: f64 = 360.0;
pub const PORTRAIT_HEIGHT: f64 = 640.0;
pub const LANDSCAPE_WIDTH: f64 = 640.0;
pub const LANDSCAPE_HEIGHT: f64 = 360.0;
pub const OFFSCREEN_MARGIN: f64 = 48.0;

// Spawning
pub const MAX_SPAWNS_PER_STEP: u32 = 3;

// Scoring
pub const COMBO_HITS_PER_STEP: u32 = 3;
pub const COMBO_MAX_MULTIPLIER: u32 = 5;

// Procedural generation budgets
pub const CONNECTOR_MAX_ATTEMPTS: u32 = 450;
pub const MATCH3_CELL_RESAMPLES: u32 = 32;
pub const MATCH3_BOARD_ATTEMPTS: u32 = 100;
pub const SLIDING_MAX_SHUFFLES: u32 = 1000;

// Economy
pub const XP_CURVE_BASE: f64 = 100.0;
pub const XP_CURVE_EXPONENT: f64 = 1.5;
pub const VIP_REWARD_MULTIPLIER: u64 = 2;
pub const STREAK_BASE_CREDITS: u64 = 10;
pub const STREAK_MAX_BONUS_DAYS: u32 = 7;
pub const MIN_PASSWORD_LEN: usize = 6;
