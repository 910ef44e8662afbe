//! Paddle game state
//!
//! Units are playfield pixels and velocities are per fixed tick. Origin is
//! the top-left corner, y grows downward.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::pong::*;
use crate::settings::{Difficulty, PongMode};

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Waiting for `start_match`
    Ready,
    Playing,
    Paused,
    /// A side reached the win score
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Horizontal travel direction of a ball heading toward this side
    pub fn inbound_dir(&self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    fn index(&self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Vertical input for a human paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    Up,
    Down,
    #[default]
    Idle,
}

impl Axis {
    pub fn value(&self) -> f32 {
        match self {
            Axis::Up => -1.0,
            Axis::Down => 1.0,
            Axis::Idle => 0.0,
        }
    }
}

/// A paddle (axis-aligned rectangle, `x`/`y` is the top-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    /// Paddle for `side`, vertically centered
    pub fn new(side: Side) -> Self {
        let x = match side {
            Side::Left => PADDLE_MARGIN,
            Side::Right => FIELD_WIDTH - PADDLE_MARGIN - PADDLE_WIDTH,
        };
        Self {
            x,
            y: (FIELD_HEIGHT - PADDLE_HEIGHT) / 2.0,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
        }
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn move_by(&mut self, dy: f32) {
        self.y += dy;
        self.clamp();
    }

    /// Keep the paddle fully inside the playfield
    pub fn clamp(&mut self) {
        self.y = self.y.clamp(0.0, FIELD_HEIGHT - self.height);
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Scalar speed; `vel` always has this length
    pub speed: f32,
    pub radius: f32,
    /// Recent positions for rendering, oldest first
    pub trail: VecDeque<Vec2>,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: field_center(),
            vel: Vec2::ZERO,
            speed: BALL_START_SPEED,
            radius: BALL_RADIUS,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
        }
    }
}

impl Ball {
    /// Record current position (call before integrating)
    pub fn record_trail(&mut self) {
        self.trail.push_back(self.pos);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }
}

pub fn field_center() -> Vec2 {
    Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0)
}

/// Complete paddle game world
#[derive(Debug, Clone)]
pub struct PaddleWorld {
    pub left: Paddle,
    pub right: Paddle,
    pub ball: Ball,
    /// Points, indexed by `Side`
    scores: [u32; 2],
    pub phase: MatchPhase,
    pub mode: PongMode,
    pub difficulty: Difficulty,
    /// Per-rally AI aim error, indexed by `Side`
    pub ai_offset: [f32; 2],
    /// Paddle hits in the current rally
    pub rally_hits: u32,
    pub time_ticks: u64,
    rng: Pcg32,
}

impl PaddleWorld {
    pub fn new(seed: u64, mode: PongMode, difficulty: Difficulty) -> Self {
        Self {
            left: Paddle::new(Side::Left),
            right: Paddle::new(Side::Right),
            ball: Ball::default(),
            scores: [0; 2],
            phase: MatchPhase::Ready,
            mode,
            difficulty,
            ai_offset: [0.0; 2],
            rally_hits: 0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Zero the scores, recenter everything and serve
    pub fn start_match(&mut self) {
        self.scores = [0; 2];
        self.left = Paddle::new(Side::Left);
        self.right = Paddle::new(Side::Right);
        self.time_ticks = 0;
        let toward = if self.rng.random_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        };
        self.reset_ball(toward);
        self.phase = MatchPhase::Playing;
        log::info!(
            "Pong match started ({:?}, {})",
            self.mode,
            self.difficulty.as_str()
        );
    }

    pub fn score(&self, side: Side) -> u32 {
        self.scores[side.index()]
    }

    pub(crate) fn add_point(&mut self, side: Side) -> u32 {
        self.scores[side.index()] += 1;
        self.scores[side.index()]
    }

    pub fn ai_offset(&self, side: Side) -> f32 {
        self.ai_offset[side.index()]
    }

    /// Side that reached the win score, if the match is over
    pub fn winner(&self) -> Option<Side> {
        if self.phase != MatchPhase::Over {
            return None;
        }
        [Side::Left, Side::Right]
            .into_iter()
            .find(|&side| self.score(side) >= WIN_SCORE)
    }

    /// Put the ball back in the center at start speed, serving toward `toward`
    pub fn reset_ball(&mut self, toward: Side) {
        let angle = self.rng.random_range(-SERVE_SPREAD..=SERVE_SPREAD);
        let speed = BALL_START_SPEED;
        self.ball.pos = field_center();
        self.ball.speed = speed;
        self.ball.vel = Vec2::new(angle.cos() * toward.inbound_dir(), angle.sin()) * speed;
        self.ball.trail.clear();
        self.rally_hits = 0;

        let margin = self.difficulty.tuning().error_margin;
        for offset in &mut self.ai_offset {
            *offset = self.rng.random_range(-margin..=margin);
        }
    }

    /// Right paddle is computer-controlled
    pub fn right_is_ai(&self) -> bool {
        self.mode == PongMode::VsAi
    }
}
