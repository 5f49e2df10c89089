//! Data-driven game balance
//!
//! Defaults mirror [`crate::consts`]; a JSON file can override any subset of
//! them without a rebuild.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay balance knobs carried by the game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration on a flying arrow (px/tick²)
    pub gravity: f32,
    /// Launch speed per pixel of pull
    pub power: f32,
    /// Max pull distance as a fraction of the smaller viewport dimension
    pub max_pull_fraction: f32,
    /// Pointer-to-arrow distance that still grabs the string
    pub grab_radius: f32,
    /// Minimum pull magnitude for a release to count as a shot
    pub release_threshold: f32,
    /// Quiver size per round
    pub starting_arrows: u8,
    /// Balloon pool size
    pub balloon_count: usize,
    /// Score awarded per pop
    pub score_per_hit: u64,
    /// Ticks between a pop and the respawn/reissue
    pub respawn_delay_ticks: u64,
    pub balloon_radius_min: f32,
    pub balloon_radius_max: f32,
    pub balloon_speed_min: f32,
    pub balloon_speed_max: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            power: POWER,
            max_pull_fraction: MAX_PULL_FRACTION,
            grab_radius: GRAB_RADIUS,
            release_threshold: RELEASE_THRESHOLD,
            starting_arrows: STARTING_ARROWS,
            balloon_count: BALLOON_COUNT,
            score_per_hit: SCORE_PER_HIT,
            respawn_delay_ticks: RESPAWN_DELAY_TICKS,
            balloon_radius_min: BALLOON_RADIUS_MIN,
            balloon_radius_max: BALLOON_RADIUS_MAX,
            balloon_speed_min: BALLOON_SPEED_MIN,
            balloon_speed_max: BALLOON_SPEED_MAX,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(err) => {
                    log::warn!("Ignoring malformed tuning file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No tuning file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }
}
