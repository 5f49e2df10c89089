//! Bowshot - an archery balloon-pop arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (aiming, arrow flight, collisions, round state)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Round leaderboard
//!
//! Rendering and input capture live in an external collaborator; the sim
//! only consumes pointer positions and viewport dimensions.

pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate (ticks per second); velocities are px/tick
    pub const TICK_RATE: u32 = 60;

    /// Downward acceleration applied to a flying arrow (px/tick²)
    pub const GRAVITY: f32 = 0.15;
    /// Launch speed per pixel of pull
    pub const POWER: f32 = 0.25;

    /// Bow anchor position as fractions of the viewport
    pub const BOW_X_FRACTION: f32 = 0.15;
    pub const BOW_Y_FRACTION: f32 = 0.5;
    /// Resting arrow sits this far in front of the anchor
    pub const REST_OFFSET: f32 = 40.0;

    /// Max pull distance as a fraction of the viewport's smaller dimension
    pub const MAX_PULL_FRACTION: f32 = 0.25;
    /// Pointer must be this close to the resting arrow to grab it
    pub const GRAB_RADIUS: f32 = 40.0;
    /// Minimum pull magnitude for a release to count as a shot
    pub const RELEASE_THRESHOLD: f32 = 6.0;

    /// Ammo per round
    pub const STARTING_ARROWS: u8 = 5;
    /// Balloon pool size
    pub const BALLOON_COUNT: usize = 5;
    /// Score awarded per popped balloon
    pub const SCORE_PER_HIT: u64 = 10;
    /// Ticks between a pop and the respawn/reissue (150 ms at 60 Hz)
    pub const RESPAWN_DELAY_TICKS: u64 = 9;

    /// Balloon spawn attribute ranges
    pub const BALLOON_RADIUS_MIN: f32 = 25.0;
    pub const BALLOON_RADIUS_MAX: f32 = 35.0;
    pub const BALLOON_SPEED_MIN: f32 = 1.0;
    pub const BALLOON_SPEED_MAX: f32 = 2.0;

    /// Balloons are confined to the right of this fraction of the width
    pub const BALLOON_REGION_FRACTION: f32 = 0.55;
    /// Fresh spawns start to the right of this fraction of the width
    pub const BALLOON_SPAWN_FRACTION: f32 = 0.6;
    /// Margin kept between a balloon and the right edge of its region
    pub const BALLOON_EDGE_MARGIN: f32 = 10.0;
    /// Vertical spawn margins (keep balloons clear of the HUD and ground)
    pub const BALLOON_SPAWN_MARGIN_TOP: f32 = 80.0;
    pub const BALLOON_SPAWN_MARGIN_BOTTOM: f32 = 120.0;
}

/// Normalize a vector, substituting a fallback direction for degenerate input
#[inline]
pub fn unit_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let len = v.length();
    if len > f32::EPSILON { v / len } else { fallback }
}
