//! Data-driven game tuning
//!
//! Everything the update loop treats as a parameter lives here so editions
//! with different margins, line counts or scoring rules are config changes,
//! not code changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which legs of the journey award points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScoringMode {
    /// Outbound climb scores, the checkpoint arms the return leg, and the
    /// return leg scores again. Reaching the start after the checkpoint wins.
    #[default]
    TwoPhase,
    /// Only the outbound climb scores; no checkpoint, no win condition.
    /// The session ends only by collision.
    Outbound,
}

/// Game tuning parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// World dimensions in pixel-equivalent units
    pub world_width: i32,
    pub world_height: i32,
    /// Visible window; the camera scrolls it vertically over the world
    pub viewport_width: i32,
    pub viewport_height: i32,
    /// Distance moved per directional input
    pub step: i32,
    /// Scoring line thresholds: line `i` sits at `i * line_spacing`
    pub total_lines: i32,
    pub line_spacing: i32,
    /// Top zone boundary; `player.y <= checkpoint_y` arms the return leg
    pub checkpoint_y: i32,
    pub player_width: i32,
    pub player_height: i32,
    pub player_start_x: i32,
    pub guard_width: i32,
    pub guard_height: i32,
    /// Number of patrolling guards
    pub guard_slots: usize,
    /// Horizontal patrol speed magnitude
    pub guard_speed: i32,
    /// Collision box shrink margins (negative inflates)
    pub margin_x: i32,
    pub margin_y: i32,
    pub scoring: ScoringMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            step: STEP,
            total_lines: TOTAL_LINES,
            line_spacing: LINE_SPACING,
            checkpoint_y: CHECKPOINT_Y,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_start_x: PLAYER_START_X,
            guard_width: GUARD_WIDTH,
            guard_height: GUARD_HEIGHT,
            guard_slots: GUARD_SLOTS,
            guard_speed: GUARD_SPEED,
            margin_x: MARGIN_X,
            margin_y: MARGIN_Y,
            scoring: ScoringMode::TwoPhase,
        }
    }
}

impl GameConfig {
    /// Player spawn row; also the finish line for the return leg
    pub fn start_y(&self) -> i32 {
        self.world_height - self.player_height
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure.
    /// A missing or malformed file is never fatal.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("Loaded game config from {}", path.display());
                    config
                }
                Err(err) => {
                    log::warn!("Bad game config {}: {err}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No game config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }
}
