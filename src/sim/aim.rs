//! Drag-to-aim gesture state machine
//!
//! The string vector points away from the target while drawn, so release
//! negates it: drawing the arrow backward and letting go sends it forward
//! along the line through the anchor.

use glam::Vec2;

use super::state::{Arrow, ArrowState, GameState, RoundPhase};
use crate::unit_or;

/// Try to grab the resting arrow
///
/// Succeeds only while the round is active, an arrow is nocked and resting,
/// and the pointer is within the grab radius. Returns whether the gesture
/// was captured, so the input collaborator can claim the pointer stream.
pub fn pointer_down(state: &mut GameState, p: Vec2) -> bool {
    if state.phase != RoundPhase::Active {
        return false;
    }
    let grab_radius = state.tuning.grab_radius;
    let Some(arrow) = state.arrow.as_mut() else {
        return false;
    };
    if arrow.state != ArrowState::Resting || p.distance(arrow.pos) >= grab_radius {
        return false;
    }
    arrow.state = ArrowState::Dragging;
    true
}

/// Drag update: move the arrow along the clamped pull vector
pub fn pointer_move(state: &mut GameState, p: Vec2) {
    let anchor = state.viewport.anchor();
    let max_pull = state.max_pull();
    let Some(arrow) = state.arrow.as_mut() else {
        return;
    };
    if arrow.state != ArrowState::Dragging {
        return;
    }

    let offset = p - anchor;
    let dist = offset.length().min(max_pull);
    arrow.pos = anchor + unit_or(offset, Vec2::X) * dist;
    // Nock faces the archer while the string is drawn
    arrow.angle = (anchor.y - arrow.pos.y).atan2(anchor.x - arrow.pos.x);
}

/// Release the string: fire if drawn past the threshold, otherwise put the
/// arrow back on the nock point
pub fn pointer_up(state: &mut GameState, p: Vec2) {
    // The release uses the final pointer position
    pointer_move(state, p);

    let anchor = state.viewport.anchor();
    let rest = state.viewport.rest_position();
    let threshold = state.tuning.release_threshold;
    let power = state.tuning.power;
    let Some(arrow) = state.arrow.as_mut() else {
        return;
    };
    if arrow.state != ArrowState::Dragging {
        return;
    }

    let pull = arrow.pos - anchor;
    let magnitude = pull.length();
    if magnitude <= threshold {
        reset_to_rest(arrow, rest);
        return;
    }

    arrow.vel = -unit_or(pull, Vec2::X) * magnitude * power;
    arrow.angle = arrow.vel.y.atan2(arrow.vel.x);
    arrow.state = ArrowState::Flying;
}

/// Pointer capture lost mid-gesture: cancel the draw without firing
pub fn pointer_cancel(state: &mut GameState) {
    let rest = state.viewport.rest_position();
    let Some(arrow) = state.arrow.as_mut() else {
        return;
    };
    if arrow.state != ArrowState::Dragging {
        return;
    }
    reset_to_rest(arrow, rest);
}

fn reset_to_rest(arrow: &mut Arrow, rest: Vec2) {
    arrow.pos = rest;
    arrow.vel = Vec2::ZERO;
    arrow.angle = 0.0;
    arrow.state = ArrowState::Resting;
}
