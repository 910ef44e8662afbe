//! Fixed timestep paddle game tick

use super::ai;
use super::collision::{paddle_bounce, wall_bounce};
use glam::Vec2;

use super::state::{Axis, MatchPhase, PaddleWorld, Side, field_center};
use crate::audio::SoundEffect;
use crate::consts::pong::{BALL_START_SPEED, FIELD_WIDTH, PADDLE_SPEED, WIN_SCORE};
use crate::settings::PongMode;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: Axis,
    pub right: Axis,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - AI drives both paddles
    pub demo: bool,
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PongEvent {
    WallBounce,
    PaddleHit(Side),
    /// `Side` scored a point
    Scored(Side),
    /// `Side` won the match
    MatchOver(Side),
    Paused,
    Resumed,
}

impl PongEvent {
    /// Sound for this event. In vs-AI mode the human is the left paddle.
    pub fn sound(&self, mode: PongMode) -> SoundEffect {
        match self {
            PongEvent::WallBounce => SoundEffect::WallBounce,
            PongEvent::PaddleHit(_) => SoundEffect::PaddleHit,
            PongEvent::Scored(_) => SoundEffect::Score,
            PongEvent::MatchOver(Side::Right) if mode == PongMode::VsAi => SoundEffect::GameOver,
            PongEvent::MatchOver(_) => SoundEffect::Win,
            PongEvent::Paused | PongEvent::Resumed => SoundEffect::Pause,
        }
    }
}

/// Advance the world by one fixed step
pub fn tick(world: &mut PaddleWorld, input: &TickInput) -> Vec<PongEvent> {
    let mut events = Vec::new();

    if input.pause {
        match world.phase {
            MatchPhase::Playing => {
                world.phase = MatchPhase::Paused;
                events.push(PongEvent::Paused);
                return events;
            }
            MatchPhase::Paused => {
                world.phase = MatchPhase::Playing;
                events.push(PongEvent::Resumed);
            }
            _ => {}
        }
    }

    if world.phase != MatchPhase::Playing {
        return events;
    }
    world.time_ticks += 1;

    // Paddles
    if input.demo {
        ai::drive(world, Side::Left);
    } else {
        world.left.move_by(input.left.value() * PADDLE_SPEED);
    }
    if input.demo || world.right_is_ai() {
        ai::drive(world, Side::Right);
    } else {
        world.right.move_by(input.right.value() * PADDLE_SPEED);
    }

    // Ball
    world.ball.record_trail();
    world.ball.pos += world.ball.vel;

    if wall_bounce(&mut world.ball) {
        events.push(PongEvent::WallBounce);
    }

    let left = world.left;
    let right = world.right;
    if paddle_bounce(&mut world.ball, &left, Side::Left) {
        world.rally_hits += 1;
        events.push(PongEvent::PaddleHit(Side::Left));
    } else if paddle_bounce(&mut world.ball, &right, Side::Right) {
        world.rally_hits += 1;
        events.push(PongEvent::PaddleHit(Side::Right));
    }

    // Scoring, as soon as the ball's edge touches an end
    let scorer = if world.ball.pos.x - world.ball.radius <= 0.0 {
        Some(Side::Right)
    } else if world.ball.pos.x + world.ball.radius >= FIELD_WIDTH {
        Some(Side::Left)
    } else {
        None
    };

    if let Some(scorer) = scorer {
        let points = world.add_point(scorer);
        events.push(PongEvent::Scored(scorer));
        log::info!(
            "{:?} scores after {} hits ({}-{})",
            scorer,
            world.rally_hits,
            world.score(Side::Left),
            world.score(Side::Right)
        );

        if points >= WIN_SCORE {
            world.phase = MatchPhase::Over;
            // Parked at the centre, at serve speed, until the next match
            world.ball.pos = field_center();
            world.ball.vel = Vec2::ZERO;
            world.ball.speed = BALL_START_SPEED;
            world.ball.trail.clear();
            world.rally_hits = 0;
            events.push(PongEvent::MatchOver(scorer));
            log::info!("{:?} wins the match", scorer);
        } else {
            world.reset_ball(scorer.opponent());
        }
    }

    events
}
