//! Axis-aligned boxes and the margin-shrunk overlap test
//!
//! Collision feel is tuned by shrinking each box's effective edges inward by
//! a per-axis margin before testing, so sprites can visually brush past each
//! other. Margins may differ per axis and may be negative (inflation).

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle: top-left corner plus width/height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }
}

/// Separating-axis overlap test on margin-shrunk boxes.
///
/// Pure predicate: the boxes overlap unless some axis separates them after
/// each box's edges are pulled inward by `margin_x`/`margin_y`.
pub fn intersects(a: Rect, b: Rect, margin_x: i32, margin_y: i32) -> bool {
    let separated = a.right() - margin_x < b.x + margin_x
        || a.x + margin_x > b.right() - margin_x
        || a.bottom() - margin_y < b.y + margin_y
        || a.y + margin_y > b.bottom() - margin_y;
    !separated
}
