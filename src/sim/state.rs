//! Game state and core simulation types
//!
//! The whole session lives in one `GameState` aggregate: no ambient globals,
//! every update function takes the state explicitly. Rendering is decoupled
//! through a drained event queue; the sim never draws.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::scoring::ScoreTracker;
use crate::config::GameConfig;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting on the opening screen; nothing ticks
    Idle,
    /// Active session: guards patrol, input moves the player
    Running,
    /// Session over; frozen until restart
    Ended,
}

/// Player facing, also the four discrete movement commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Returned to the start row after the checkpoint
    Win,
    /// Caught by a guard
    Tagged,
}

/// The player avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub facing: Direction,
    pub width: i32,
    pub height: i32,
}

impl Player {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A patrolling guard: oscillates horizontally on a fixed row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guard {
    /// Only x ever changes after spawn
    pub x: i32,
    pub y: i32,
    /// Signed horizontal velocity; independent per guard
    pub vx: i32,
    pub width: i32,
    pub height: i32,
}

impl Guard {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Render-surface output: the sim emits values, a frontend consumes them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PlayerMoved { x: i32, y: i32, facing: Direction },
    GuardMoved { slot: usize, x: i32, y: i32 },
    CameraMoved { offset: i32 },
    ScoreChanged { score: u32 },
    SessionStarted,
    SessionEnded { outcome: Outcome, score: u32 },
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    /// Seed for guard placement; sessions are reproducible per seed
    pub seed: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub guards: Vec<Guard>,
    pub tracker: ScoreTracker,
    /// Vertical scroll offset, recomputed after every player move
    pub camera_offset: i32,
    /// Set exactly once, on entering `Ended`
    pub outcome: Option<Outcome>,
    /// Frame ticks elapsed while running
    pub time_ticks: u64,
    /// Sessions started; salts guard placement on restart
    pub sessions: u32,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game in the `Idle` phase
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let player = Player {
            x: config.player_start_x,
            y: config.start_y(),
            facing: Direction::Up,
            width: config.player_width,
            height: config.player_height,
        };
        let guards = spawn_guards(&config, seed);
        let tracker = ScoreTracker::new(config.total_lines);
        Self {
            config,
            seed,
            phase: GamePhase::Idle,
            player,
            guards,
            tracker,
            camera_offset: 0,
            outcome: None,
            time_ticks: 0,
            sessions: 0,
            events: Vec::new(),
        }
    }

    /// Put everything back to session-start values. Used by the start and
    /// restart transitions; the phase itself is set by the caller.
    pub(crate) fn reset(&mut self) {
        self.player.x = self.config.player_start_x;
        self.player.y = self.config.start_y();
        self.player.facing = Direction::Up;
        self.guards = spawn_guards(&self.config, self.seed.wrapping_add(self.sessions as u64));
        self.tracker.reset(self.config.total_lines);
        self.camera_offset = 0;
        self.outcome = None;
        self.time_ticks = 0;
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand accumulated render events to the frontend
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn score(&self) -> u32 {
        self.tracker.score
    }
}

/// Place one guard per slot on its own row, columns jittered by the seed,
/// patrol directions alternating per slot.
fn spawn_guards(config: &GameConfig, seed: u64) -> Vec<Guard> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let max_x = (config.world_width - config.guard_width).max(0);
    (0..config.guard_slots)
        .map(|slot| {
            let row = (slot as i32 % config.total_lines.max(1)) + 1;
            let y = row * config.line_spacing - config.guard_height / 2;
            let x = rng.random_range(0..=max_x);
            let vx = if slot % 2 == 0 {
                config.guard_speed
            } else {
                -config.guard_speed
            };
            Guard {
                x,
                y,
                vx,
                width: config.guard_width,
                height: config.guard_height,
            }
        })
        .collect()
}
