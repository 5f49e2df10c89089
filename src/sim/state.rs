//! Game state and core simulation types
//!
//! All state that must be persisted for determinism lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No round has been started yet
    NotStarted,
    /// Round in progress
    Active,
    /// Quiver empty; final score is frozen
    Ended,
}

/// Arrow state - resting on the string, being drawn, or in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrowState {
    Resting,
    Dragging,
    Flying,
}

/// The arrow entity (at most one live instance at a time)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arrow {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Orientation in radians: along the travel direction in flight,
    /// toward the anchor while drawn
    pub angle: f32,
    pub state: ArrowState,
}

impl Arrow {
    /// A fresh arrow resting at the nock point
    pub fn at_rest(viewport: &Viewport) -> Self {
        Self {
            pos: viewport.rest_position(),
            vel: Vec2::ZERO,
            angle: 0.0,
            state: ArrowState::Resting,
        }
    }
}

/// A balloon entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balloon {
    pub pos: Vec2,
    pub radius: f32,
    /// Horizontal drift velocity (px/tick); sign flips at the region bounds
    pub vx: f32,
    /// Color tag as a hue in degrees (the renderer reads it, the sim never does)
    pub hue: f32,
    pub popped: bool,
}

/// Viewport dimensions in simulation pixel space
///
/// The bow anchor, pull limits, and balloon region all derive from these,
/// so swapping the viewport re-derives every bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Bow anchor point
    #[inline]
    pub fn anchor(&self) -> Vec2 {
        Vec2::new(self.width * BOW_X_FRACTION, self.height * BOW_Y_FRACTION)
    }

    /// Canonical rest position for the arrow
    #[inline]
    pub fn rest_position(&self) -> Vec2 {
        self.anchor() + Vec2::new(REST_OFFSET, 0.0)
    }

    /// Left edge of the balloon region
    #[inline]
    pub fn balloon_min_x(&self) -> f32 {
        self.width * BALLOON_REGION_FRACTION
    }

    /// Right edge of the balloon region for a balloon of the given radius
    #[inline]
    pub fn balloon_max_x(&self, radius: f32) -> f32 {
        self.width - radius - BALLOON_EDGE_MARGIN
    }

    /// Whether a point is still inside the field
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }
}

/// A scheduled respawn/reissue, processed at tick boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRespawn {
    /// Pool index of the popped balloon
    pub balloon: usize,
    /// Tick at which the respawn and the next arrow are due
    pub due_tick: u64,
}

/// Events emitted by a tick for the presentation collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A balloon popped; `score` already includes the award
    BalloonPopped { balloon: usize, score: u64 },
    /// The arrow left the field; no score change
    ArrowLost,
    /// A fresh arrow was nocked
    ArrowIssued { arrows_left: u8 },
    /// Quiver empty; the round is over
    RoundEnded { final_score: u64 },
}

/// Complete round state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG; all balloon randomization flows through it
    pub rng: Pcg32,
    pub viewport: Viewport,
    pub tuning: Tuning,
    pub phase: RoundPhase,
    pub score: u64,
    /// Arrows remaining in the quiver (the nocked arrow is not counted)
    pub arrows_left: u8,
    /// Tick counter, reset each round
    pub time_ticks: u64,
    /// The live arrow; `None` between a consumption event and the next issuance
    pub arrow: Option<Arrow>,
    /// Fixed-size balloon pool; popped balloons respawn in place
    pub balloons: Vec<Balloon>,
    /// Scheduled respawns, cleared when the round ends
    pub pending: Vec<PendingRespawn>,
}

impl GameState {
    /// Create a state with the given seed; call [`start_round`](Self::start_round) to play
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            viewport,
            tuning,
            phase: RoundPhase::NotStarted,
            score: 0,
            arrows_left: 0,
            time_ticks: 0,
            arrow: None,
            balloons: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Begin a round: reset score and quiver, repopulate the pool, and nock
    /// the first arrow without spending ammo
    pub fn start_round(&mut self) {
        self.score = 0;
        self.arrows_left = self.tuning.starting_arrows;
        self.time_ticks = 0;
        self.pending.clear();
        self.spawn_balloons();
        self.arrow = Some(Arrow::at_rest(&self.viewport));
        self.phase = RoundPhase::Active;
        log::info!(
            "round started: seed {}, {} balloons, {} arrows",
            self.seed,
            self.balloons.len(),
            self.arrows_left
        );
    }

    /// Replace the viewport; all derived bounds re-derive on demand, and a
    /// resting arrow snaps to the new nock point
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(arrow) = self.arrow.as_mut() {
            if arrow.state == ArrowState::Resting {
                arrow.pos = viewport.rest_position();
            }
        }
    }

    /// Maximum pull distance for the current viewport
    #[inline]
    pub fn max_pull(&self) -> f32 {
        self.viewport.width.min(self.viewport.height) * self.tuning.max_pull_fraction
    }

    /// Repopulate the balloon pool from scratch
    pub fn spawn_balloons(&mut self) {
        let count = self.tuning.balloon_count;
        let mut pool = Vec::with_capacity(count);
        for _ in 0..count {
            pool.push(self.random_balloon());
        }
        self.balloons = pool;
    }

    /// Respawn a popped balloon in place with fresh attributes
    pub fn respawn_balloon(&mut self, index: usize) {
        let fresh = self.random_balloon();
        if let Some(balloon) = self.balloons.get_mut(index) {
            *balloon = fresh;
        }
    }

    fn random_balloon(&mut self) -> Balloon {
        let radius = self
            .rng
            .random_range(self.tuning.balloon_radius_min..self.tuning.balloon_radius_max);

        // Degenerate viewports can collapse the spawn window; keep it non-empty
        let min_x = self.viewport.width * BALLOON_SPAWN_FRACTION;
        let max_x = (self.viewport.balloon_max_x(radius) - BALLOON_EDGE_MARGIN).max(min_x + 1.0);
        let min_y = BALLOON_SPAWN_MARGIN_TOP;
        let max_y = (self.viewport.height - BALLOON_SPAWN_MARGIN_BOTTOM).max(min_y + 1.0);

        let speed = self
            .rng
            .random_range(self.tuning.balloon_speed_min..self.tuning.balloon_speed_max);
        let vx = if self.rng.random_bool(0.5) { speed } else { -speed };

        Balloon {
            pos: Vec2::new(
                self.rng.random_range(min_x..max_x),
                self.rng.random_range(min_y..max_y),
            ),
            radius,
            vx,
            hue: self.rng.random_range(0.0..360.0),
            popped: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_start_round_resets() {
        let mut state = GameState::new(1, viewport(), Tuning::default());
        assert_eq!(state.phase, RoundPhase::NotStarted);

        state.start_round();
        assert_eq!(state.phase, RoundPhase::Active);
        assert_eq!(state.score, 0);
        assert_eq!(state.arrows_left, STARTING_ARROWS);
        assert_eq!(state.balloons.len(), BALLOON_COUNT);

        let arrow = state.arrow.as_ref().unwrap();
        assert_eq!(arrow.state, ArrowState::Resting);
        assert_eq!(arrow.pos, viewport().rest_position());
        assert_eq!(arrow.vel, Vec2::ZERO);
    }

    #[test]
    fn test_spawn_attributes_within_ranges() {
        let mut state = GameState::new(42, viewport(), Tuning::default());
        state.start_round();

        for balloon in &state.balloons {
            assert!(balloon.radius >= BALLOON_RADIUS_MIN && balloon.radius < BALLOON_RADIUS_MAX);
            assert!(balloon.vx.abs() >= BALLOON_SPEED_MIN && balloon.vx.abs() < BALLOON_SPEED_MAX);
            assert!(balloon.pos.x >= state.viewport.balloon_min_x());
            assert!(balloon.pos.x <= state.viewport.balloon_max_x(balloon.radius));
            assert!((0.0..360.0).contains(&balloon.hue));
            assert!(!balloon.popped);
        }
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = GameState::new(99, viewport(), Tuning::default());
        let mut b = GameState::new(99, viewport(), Tuning::default());
        a.start_round();
        b.start_round();

        for (x, y) in a.balloons.iter().zip(&b.balloons) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.radius, y.radius);
            assert_eq!(x.vx, y.vx);
            assert_eq!(x.hue, y.hue);
        }
    }

    #[test]
    fn test_set_viewport_snaps_resting_arrow() {
        let mut state = GameState::new(3, viewport(), Tuning::default());
        state.start_round();

        let wide = Viewport::new(1600.0, 900.0);
        state.set_viewport(wide);
        assert_eq!(state.arrow.as_ref().unwrap().pos, wide.rest_position());
        assert_eq!(state.max_pull(), 900.0 * MAX_PULL_FRACTION);
    }

    #[test]
    fn test_respawn_replaces_in_place() {
        let mut state = GameState::new(5, viewport(), Tuning::default());
        state.start_round();

        state.balloons[2].popped = true;
        state.respawn_balloon(2);
        assert!(!state.balloons[2].popped);
        assert_eq!(state.balloons.len(), BALLOON_COUNT);
    }
}
