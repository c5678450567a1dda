//! Vertical scroll framing
//!
//! The world is taller than the viewport; the camera keeps the player
//! vertically centered until it hits a world edge.

/// Scroll offset that frames the player, clamped to the world extent.
///
/// Pure function, recomputed every tick; no state retained.
pub fn camera_offset(player_y: i32, player_height: i32, viewport_height: i32, world_height: i32) -> i32 {
    let offset = player_y - viewport_height / 2 + player_height / 2;
    offset.clamp(0, (world_height - viewport_height).max(0))
}
