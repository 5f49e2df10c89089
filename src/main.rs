//! Bowshot entry point
//!
//! Headless demo driver: autoplays one round with a simple aim-at-balloon
//! policy and records the result. A rendering front end drives the sim the
//! same way - pointer gestures in, state snapshots and events out.

use std::path::Path;

use glam::Vec2;

use bowshot::sim::{self, ArrowState, GameEvent, GameState, RoundPhase, Viewport};
use bowshot::{HighScores, Tuning, unit_or};

/// Hard cap on driver iterations so a broken tuning can't spin forever
const MAX_TICKS: u32 = 100_000;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xB0B0);

    let tuning = Tuning::load_or_default(Path::new("tuning.json"));
    let mut state = GameState::new(seed, Viewport::new(800.0, 600.0), tuning);
    state.start_round();

    let mut hits = 0u32;
    for _ in 0..MAX_TICKS {
        if state.phase != RoundPhase::Active {
            break;
        }

        if matches!(state.arrow, Some(ref a) if a.state == ArrowState::Resting) {
            draw_and_release(&mut state);
        }

        for event in sim::tick(&mut state) {
            match event {
                GameEvent::BalloonPopped { balloon, score } => {
                    hits += 1;
                    println!("pop! balloon {balloon}, score {score}");
                }
                GameEvent::ArrowLost => println!("missed, arrow left the field"),
                GameEvent::ArrowIssued { arrows_left } => {
                    println!("nocked a fresh arrow ({arrows_left} left)");
                }
                GameEvent::RoundEnded { final_score } => {
                    println!("round over, final score {final_score}");
                }
            }
        }
    }

    println!("score {} with {hits} hits (seed {seed})", state.score);

    let path = Path::new("highscores.json");
    let mut scores = HighScores::load(path);
    if let Some(rank) = scores.add_score(state.score, hits) {
        println!("new high score at rank {rank}");
        scores.save(path);
    }
}

/// Synthesize a full drag gesture aimed at the first live balloon
///
/// Draws the string directly away from the aim point at full pull, with a
/// first-order lead for gravity drop over the estimated flight time.
fn draw_and_release(state: &mut GameState) {
    let anchor = state.viewport.anchor();
    let target = state
        .balloons
        .iter()
        .find(|b| !b.popped)
        .map(|b| b.pos)
        .unwrap_or(anchor + Vec2::X);

    let pull = state.max_pull();
    let speed = (pull * state.tuning.power).max(0.1);
    let flight_ticks = target.distance(anchor) / speed;
    let drop = 0.5 * state.tuning.gravity * flight_ticks * flight_ticks;
    let aim = Vec2::new(target.x, target.y - drop);

    let dir = unit_or(aim - anchor, Vec2::X);
    let drawn = anchor - dir * pull;

    let grab_point = match state.arrow.as_ref() {
        Some(arrow) => arrow.pos,
        None => return,
    };
    if sim::pointer_down(state, grab_point) {
        sim::pointer_move(state, drawn);
        sim::pointer_up(state, drawn);
    }
}
