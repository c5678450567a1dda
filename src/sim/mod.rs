//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Integer world units only
//! - Seeded RNG only (guard placement)
//! - No rendering or platform dependencies; frontends consume drained events

pub mod camera;
pub mod geom;
pub mod scoring;
pub mod state;
pub mod tick;

pub use camera::camera_offset;
pub use geom::{Rect, intersects};
pub use scoring::ScoreTracker;
pub use state::{Direction, GameEvent, GamePhase, GameState, Guard, Outcome, Player};
pub use tick::{apply_input, start, tick};
