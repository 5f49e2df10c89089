//! Per-tick flight integration, collision resolution, and ammo policy
//!
//! The step function that advances a round deterministically. One call is
//! one unit step; the driver owns the wall-clock pacing.

use super::collision::{first_hit, out_of_bounds};
use super::state::{Arrow, ArrowState, GameEvent, GameState, PendingRespawn, RoundPhase};

/// Advance the round by one unit step
///
/// Returns the events produced this tick so the presentation collaborator
/// can react without polling the state.
pub fn tick(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.phase != RoundPhase::Active {
        return events;
    }

    state.time_ticks += 1;

    process_due_respawns(state, &mut events);
    if state.phase != RoundPhase::Active {
        return events;
    }

    advance_arrow(state, &mut events);
    if state.phase != RoundPhase::Active {
        return events;
    }

    advance_balloons(state);
    resolve_hit(state, &mut events);

    events
}

/// Issue the next arrow, or end the round when the quiver is empty
///
/// Issuance and the ammo decrement are atomic as a pair; the first arrow of
/// a round comes from `start_round` and does not pass through here.
pub fn issue_next(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.arrows_left == 0 {
        state.phase = RoundPhase::Ended;
        state.arrow = None;
        state.pending.clear();
        log::info!("quiver empty, round over: final score {}", state.score);
        events.push(GameEvent::RoundEnded {
            final_score: state.score,
        });
        return;
    }

    state.arrows_left -= 1;
    state.arrow = Some(Arrow::at_rest(&state.viewport));
    events.push(GameEvent::ArrowIssued {
        arrows_left: state.arrows_left,
    });
}

/// Fire any respawn scheduled for this tick or earlier
fn process_due_respawns(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let now = state.time_ticks;
    let due: Vec<usize> = state
        .pending
        .iter()
        .filter(|p| p.due_tick <= now)
        .map(|p| p.balloon)
        .collect();
    state.pending.retain(|p| p.due_tick > now);

    for balloon in due {
        state.respawn_balloon(balloon);
        issue_next(state, events);
        if state.phase != RoundPhase::Active {
            break;
        }
    }
}

fn advance_arrow(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let gravity = state.tuning.gravity;
    let Some(arrow) = state.arrow.as_mut() else {
        return;
    };
    if arrow.state != ArrowState::Flying {
        return;
    }

    arrow.vel.y += gravity;
    arrow.pos += arrow.vel;
    // Nose follows the travel direction in flight
    arrow.angle = arrow.vel.y.atan2(arrow.vel.x);

    if out_of_bounds(arrow.pos, &state.viewport) {
        // A miss consumes the arrow with no score change
        state.arrow = None;
        events.push(GameEvent::ArrowLost);
        issue_next(state, events);
    }
}

fn advance_balloons(state: &mut GameState) {
    let min_x = state.viewport.balloon_min_x();
    for balloon in state.balloons.iter_mut().filter(|b| !b.popped) {
        balloon.pos.x += balloon.vx;

        let max_x = state.viewport.balloon_max_x(balloon.radius).max(min_x);
        if balloon.pos.x < min_x || balloon.pos.x > max_x {
            balloon.vx = -balloon.vx;
            balloon.pos.x = balloon.pos.x.clamp(min_x, max_x);
        }
    }
}

fn resolve_hit(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let Some(arrow) = state.arrow.as_ref() else {
        return;
    };
    if arrow.state != ArrowState::Flying {
        return;
    }
    let Some(hit) = first_hit(arrow.pos, &state.balloons) else {
        return;
    };

    // Popped synchronously, so the deferred respawn can never double-score
    state.balloons[hit].popped = true;
    state.score += state.tuning.score_per_hit;
    state.arrow = None;
    state.pending.push(PendingRespawn {
        balloon: hit,
        due_tick: state.time_ticks + state.tuning.respawn_delay_ticks,
    });
    log::debug!("balloon {} popped, score {}", hit, state.score);
    events.push(GameEvent::BalloonPopped {
        balloon: hit,
        score: state.score,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn active_state() -> GameState {
        let mut state = GameState::new(11, Viewport::new(800.0, 600.0), Tuning::default());
        state.start_round();
        state
    }

    /// Put the nocked arrow directly into flight at the given position
    fn launch(state: &mut GameState, pos: Vec2, vel: Vec2) {
        let arrow = state.arrow.as_mut().unwrap();
        arrow.pos = pos;
        arrow.vel = vel;
        arrow.state = ArrowState::Flying;
    }

    /// Park every balloon away from a flight corridor along y = 300
    fn clear_corridor(state: &mut GameState) {
        for balloon in &mut state.balloons {
            balloon.pos.y = 100.0;
            balloon.vx = 0.0;
        }
    }

    #[test]
    fn test_tick_noop_unless_active() {
        let mut state = GameState::new(1, Viewport::new(800.0, 600.0), Tuning::default());
        assert!(tick(&mut state).is_empty());
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_gravity_integration() {
        let mut state = active_state();
        clear_corridor(&mut state);
        launch(&mut state, Vec2::new(200.0, 300.0), Vec2::new(5.0, 0.0));

        tick(&mut state);
        let arrow = state.arrow.as_ref().unwrap();
        assert!((arrow.vel.y - GRAVITY).abs() < 1e-6);
        assert!((arrow.pos.x - 205.0).abs() < 1e-4);
        // Nose tips along the (now slightly downward) travel direction
        assert!((arrow.angle - arrow.vel.y.atan2(arrow.vel.x)).abs() < 1e-6);
    }

    #[test]
    fn test_resting_arrow_does_not_fall() {
        let mut state = active_state();
        let before = state.arrow.as_ref().unwrap().pos;
        tick(&mut state);
        let arrow = state.arrow.as_ref().unwrap();
        assert_eq!(arrow.pos, before);
        assert_eq!(arrow.vel, Vec2::ZERO);
    }

    #[test]
    fn test_miss_issues_next_arrow_without_scoring() {
        let mut state = active_state();
        clear_corridor(&mut state);
        // One step from the right edge
        launch(&mut state, Vec2::new(799.0, 300.0), Vec2::new(50.0, 0.0));

        let events = tick(&mut state);
        assert!(events.contains(&GameEvent::ArrowLost));
        assert!(events.contains(&GameEvent::ArrowIssued {
            arrows_left: STARTING_ARROWS - 1
        }));
        assert_eq!(state.score, 0);
        assert_eq!(state.arrows_left, STARTING_ARROWS - 1);
        assert_eq!(state.arrow.as_ref().unwrap().state, ArrowState::Resting);
    }

    #[test]
    fn test_last_arrow_lost_ends_round() {
        // Quiver of one: the issued arrow leaves it empty, and the next
        // consumption must end the round instead of nocking another
        let mut state = active_state();
        clear_corridor(&mut state);
        state.arrows_left = 1;
        launch(&mut state, Vec2::new(799.0, 300.0), Vec2::new(50.0, 0.0));

        let events = tick(&mut state);
        assert!(events.contains(&GameEvent::ArrowIssued { arrows_left: 0 }));
        assert_eq!(state.phase, RoundPhase::Active);

        launch(&mut state, Vec2::new(799.0, 300.0), Vec2::new(50.0, 0.0));
        let events = tick(&mut state);
        assert!(events.contains(&GameEvent::RoundEnded { final_score: 0 }));
        assert_eq!(state.phase, RoundPhase::Ended);
        assert!(state.arrow.is_none());

        // An ended round is frozen
        assert!(tick(&mut state).is_empty());
    }

    #[test]
    fn test_hit_pops_scores_and_schedules_reissue() {
        let mut state = active_state();
        clear_corridor(&mut state);
        state.balloons[0].pos = Vec2::new(600.0, 300.0);
        state.balloons[0].radius = 30.0;
        launch(&mut state, Vec2::new(590.0, 300.0), Vec2::new(5.0, -GRAVITY));

        let events = tick(&mut state);
        assert!(events.contains(&GameEvent::BalloonPopped {
            balloon: 0,
            score: SCORE_PER_HIT
        }));
        assert_eq!(state.score, SCORE_PER_HIT);
        assert!(state.balloons[0].popped);
        assert!(state.arrow.is_none());
        assert_eq!(state.pending.len(), 1);

        // The respawn and reissue land together after the grace delay
        let mut reissued = false;
        for _ in 0..RESPAWN_DELAY_TICKS {
            for event in tick(&mut state) {
                if let GameEvent::ArrowIssued { arrows_left } = event {
                    assert_eq!(arrows_left, STARTING_ARROWS - 1);
                    reissued = true;
                }
            }
        }
        assert!(reissued);
        assert!(!state.balloons[0].popped);
        assert!(state.pending.is_empty());
        assert_eq!(state.arrow.as_ref().unwrap().state, ArrowState::Resting);
    }

    #[test]
    fn test_overlapping_balloons_pop_first_in_pool_order() {
        let mut state = active_state();
        clear_corridor(&mut state);
        for index in [1, 3] {
            state.balloons[index].pos = Vec2::new(600.0, 300.0);
            state.balloons[index].radius = 30.0;
        }
        launch(&mut state, Vec2::new(595.0, 300.0), Vec2::new(5.0, -GRAVITY));

        tick(&mut state);
        assert!(state.balloons[1].popped);
        assert!(!state.balloons[3].popped);
        assert_eq!(state.score, SCORE_PER_HIT);
    }

    #[test]
    fn test_popped_pool_keeps_its_size() {
        let mut state = active_state();
        clear_corridor(&mut state);
        state.balloons[0].pos = Vec2::new(600.0, 300.0);
        state.balloons[0].radius = 30.0;
        launch(&mut state, Vec2::new(590.0, 300.0), Vec2::new(5.0, -GRAVITY));

        tick(&mut state);
        assert_eq!(state.balloons.len(), BALLOON_COUNT);
    }

    #[test]
    fn test_hit_on_last_arrow_ends_round_after_delay() {
        let mut state = active_state();
        clear_corridor(&mut state);
        state.arrows_left = 0;
        state.balloons[0].pos = Vec2::new(600.0, 300.0);
        state.balloons[0].radius = 30.0;
        launch(&mut state, Vec2::new(590.0, 300.0), Vec2::new(5.0, -GRAVITY));

        tick(&mut state);
        assert_eq!(state.score, SCORE_PER_HIT);
        assert_eq!(state.phase, RoundPhase::Active);

        let mut ended = false;
        for _ in 0..RESPAWN_DELAY_TICKS {
            for event in tick(&mut state) {
                if let GameEvent::RoundEnded { final_score } = event {
                    assert_eq!(final_score, SCORE_PER_HIT);
                    ended = true;
                }
            }
        }
        assert!(ended);
        assert_eq!(state.phase, RoundPhase::Ended);
        // The balloon still respawns before the issuance attempt ends the round
        assert!(!state.balloons[0].popped);
    }

    #[test]
    fn test_pending_respawn_suppressed_after_explicit_exit() {
        let mut state = active_state();
        clear_corridor(&mut state);
        state.balloons[0].pos = Vec2::new(600.0, 300.0);
        state.balloons[0].radius = 30.0;
        launch(&mut state, Vec2::new(590.0, 300.0), Vec2::new(5.0, -GRAVITY));
        tick(&mut state);
        assert_eq!(state.pending.len(), 1);

        // Player exits mid-delay; the queued respawn must not fire
        state.phase = RoundPhase::Ended;
        for _ in 0..=RESPAWN_DELAY_TICKS {
            assert!(tick(&mut state).is_empty());
        }
        assert!(state.balloons[0].popped);
        assert!(state.arrow.is_none());
    }

    #[test]
    fn test_balloons_reflect_at_region_bounds() {
        let mut state = active_state();
        let min_x = state.viewport.balloon_min_x();
        let balloon = &mut state.balloons[0];
        balloon.pos.x = min_x + 0.5;
        balloon.vx = -1.5;

        tick(&mut state);
        let balloon = &state.balloons[0];
        assert!(balloon.vx > 0.0);
        assert!(balloon.pos.x >= min_x);

        let max_x = state.viewport.balloon_max_x(state.balloons[0].radius);
        let balloon = &mut state.balloons[0];
        balloon.pos.x = max_x - 0.5;
        balloon.vx = 1.5;

        tick(&mut state);
        let balloon = &state.balloons[0];
        assert!(balloon.vx < 0.0);
        assert!(balloon.pos.x <= max_x);
    }

    #[test]
    fn test_popped_balloons_do_not_drift() {
        let mut state = active_state();
        state.balloons[0].popped = true;
        let before = state.balloons[0].pos;
        tick(&mut state);
        assert_eq!(state.balloons[0].pos, before);
    }
}
