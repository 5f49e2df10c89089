//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Unit timestep only (velocities are px/tick)
//! - Seeded RNG only
//! - Stable iteration order (balloon pool order)
//! - No rendering or platform dependencies

pub mod aim;
pub mod collision;
pub mod flight;
pub mod state;

pub use aim::{pointer_cancel, pointer_down, pointer_move, pointer_up};
pub use collision::{arrow_hits_balloon, first_hit, out_of_bounds};
pub use flight::{issue_next, tick};
pub use state::{
    Arrow, ArrowState, Balloon, GameEvent, GameState, PendingRespawn, RoundPhase, Viewport,
};
