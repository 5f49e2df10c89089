//! Collision and bounds predicates
//!
//! The sim only needs point-vs-circle tests: the arrow tip against balloon
//! hulls, and a four-sided field bounds check.

use glam::Vec2;

use super::state::{Balloon, Viewport};

/// Whether the arrow tip is inside a live balloon's hull
#[inline]
pub fn arrow_hits_balloon(pos: Vec2, balloon: &Balloon) -> bool {
    !balloon.popped && pos.distance(balloon.pos) < balloon.radius
}

/// First balloon in pool order hit by the arrow tip
///
/// First match wins, so simultaneous overlaps resolve by pool order.
pub fn first_hit(pos: Vec2, balloons: &[Balloon]) -> Option<usize> {
    balloons.iter().position(|b| arrow_hits_balloon(pos, b))
}

/// Whether a point has left the field on any side
#[inline]
pub fn out_of_bounds(pos: Vec2, viewport: &Viewport) -> bool {
    !viewport.contains(pos)
}
