//! Checkpoint Dash - a top-down avoidance game
//!
//! The player climbs a vertical track to a checkpoint zone and returns to the
//! start while dodging horizontally patrolling guards, scoring a point for
//! each distance line crossed on each leg of the trip.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, patrols, scoring, collisions)
//! - `config`: Data-driven game tuning
//! - `leaderboard`: Remote score store and client-side ranking

pub mod config;
pub mod leaderboard;
pub mod sim;

pub use config::{GameConfig, ScoringMode};
pub use leaderboard::{ScoreEntry, ScoreStore};

/// Default game tuning constants
pub mod consts {
    /// World dimensions (pixel-equivalent units)
    pub const WORLD_WIDTH: i32 = 400;
    pub const WORLD_HEIGHT: i32 = 840;

    /// Visible window onto the world; the camera scrolls vertically
    pub const VIEWPORT_WIDTH: i32 = 400;
    pub const VIEWPORT_HEIGHT: i32 = 500;

    /// Player sprite box and spawn column
    pub const PLAYER_WIDTH: i32 = 40;
    pub const PLAYER_HEIGHT: i32 = 50;
    pub const PLAYER_START_X: i32 = 180;

    /// Distance moved per directional input
    pub const STEP: i32 = 20;

    /// Scoring lines: `TOTAL_LINES` thresholds spaced `LINE_SPACING` apart
    pub const TOTAL_LINES: i32 = 5;
    pub const LINE_SPACING: i32 = 150;

    /// Top zone; reaching it arms the return leg
    pub const CHECKPOINT_Y: i32 = 50;

    /// Guard defaults
    pub const GUARD_WIDTH: i32 = 40;
    pub const GUARD_HEIGHT: i32 = 40;
    pub const GUARD_SLOTS: usize = 5;
    pub const GUARD_SPEED: i32 = 2;

    /// Collision box shrink margins (negative inflates)
    pub const MARGIN_X: i32 = 6;
    pub const MARGIN_Y: i32 = -2;
}
