//! Line-crossing score tracker
//!
//! The world is banded by `total_lines` horizontal thresholds, line `i` at
//! `y = i * line_spacing`. A session is a two-leg journey: climb to the
//! checkpoint zone at the top, then return to the start row. Each threshold
//! awards one point the first time it is crossed on the current leg.
//!
//! The full threshold list is re-scanned on every update, in the direction of
//! travel, with `last_line_crossed` as the high-water mark. That makes the
//! tracker robust to step sizes larger than the line spacing (all newly
//! passed lines score in one tick) and to backtracking (no line scores twice
//! on a leg, and the score never decreases).

use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, ScoringMode};

/// Per-session scoring state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    /// Points earned this session; monotonically non-decreasing
    pub score: u32,
    /// High-water mark of the scan; starts at `total_lines + 1` outbound,
    /// reset to 0 when the checkpoint flips the direction of travel
    pub last_line_crossed: i32,
    /// Direction of travel; flips to false at most once per session
    pub going_up: bool,
    /// One-way latch set on reaching the checkpoint zone
    pub checkpoint_reached: bool,
}

impl ScoreTracker {
    pub fn new(total_lines: i32) -> Self {
        Self {
            score: 0,
            last_line_crossed: total_lines + 1,
            going_up: true,
            checkpoint_reached: false,
        }
    }

    pub fn reset(&mut self, total_lines: i32) {
        *self = Self::new(total_lines);
    }

    /// Re-scan the thresholds against the player's row.
    ///
    /// Returns true if any point was awarded. Call after every accepted
    /// position change, before the win check that reads the flags.
    pub fn update(&mut self, player_y: i32, config: &GameConfig) -> bool {
        let before = self.score;

        if self.going_up {
            // Farthest line first so the mark lands on the nearest one
            // crossed, even when one step clears several lines.
            for i in (1..=config.total_lines).rev() {
                if player_y <= i * config.line_spacing && self.last_line_crossed > i {
                    self.score += 1;
                    self.last_line_crossed = i;
                }
            }
            if config.scoring == ScoringMode::TwoPhase && player_y <= config.checkpoint_y {
                self.checkpoint_reached = true;
                self.going_up = false;
                // Baseline for the return scan: no line crossed yet
                self.last_line_crossed = 0;
            }
        } else if self.checkpoint_reached {
            for i in 1..=config.total_lines {
                if player_y >= i * config.line_spacing && self.last_line_crossed < i {
                    self.score += 1;
                    self.last_line_crossed = i;
                }
            }
        }

        self.score != before
    }
}
