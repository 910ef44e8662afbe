//! Ball collision: walls and paddles
//!
//! Paddle hits use an axis-aligned overlap test plus a direction guard. A
//! paddle only registers a hit while the ball travels toward it, so a ball
//! still overlapping after a bounce cannot be hit twice.

use glam::Vec2;

use super::state::{Ball, Paddle, Side};
use crate::consts::pong::{
    BALL_MAX_SPEED, BALL_SPEED_STEP, FIELD_HEIGHT, HIT_NUDGE, MAX_BOUNCE_ANGLE,
};

/// Reflect off the top/bottom walls. Returns true on contact.
pub fn wall_bounce(ball: &mut Ball) -> bool {
    if ball.pos.y - ball.radius < 0.0 {
        ball.pos.y = ball.radius;
        ball.vel.y = ball.vel.y.abs();
        true
    } else if ball.pos.y + ball.radius > FIELD_HEIGHT {
        ball.pos.y = FIELD_HEIGHT - ball.radius;
        ball.vel.y = -ball.vel.y.abs();
        true
    } else {
        false
    }
}

/// Ball's bounding box intersects the paddle
pub fn overlaps(ball: &Ball, paddle: &Paddle) -> bool {
    ball.pos.x + ball.radius > paddle.x
        && ball.pos.x - ball.radius < paddle.x + paddle.width
        && ball.pos.y + ball.radius > paddle.y
        && ball.pos.y - ball.radius < paddle.y + paddle.height
}

/// Ball is travelling toward `side`
pub fn approaching(ball: &Ball, side: Side) -> bool {
    ball.vel.x * side.inbound_dir() > 0.0
}

/// Where on the paddle the ball struck, -1 (top edge) to 1 (bottom edge)
pub fn hit_offset(ball: &Ball, paddle: &Paddle) -> f32 {
    ((ball.pos.y - paddle.center_y()) / (paddle.height / 2.0)).clamp(-1.0, 1.0)
}

/// Bounce off `side`'s paddle if it is hit. Returns true on a hit.
pub fn paddle_bounce(ball: &mut Ball, paddle: &Paddle, side: Side) -> bool {
    if !approaching(ball, side) || !overlaps(ball, paddle) {
        return false;
    }

    let angle = hit_offset(ball, paddle) * MAX_BOUNCE_ANGLE;
    ball.speed = (ball.speed + BALL_SPEED_STEP).min(BALL_MAX_SPEED);

    let out = -side.inbound_dir();
    ball.vel = Vec2::new(angle.cos() * out, angle.sin()) * ball.speed;

    // Move clear of the paddle face
    ball.pos.x = match side {
        Side::Left => paddle.x + paddle.width + ball.radius + HIT_NUDGE,
        Side::Right => paddle.x - ball.radius - HIT_NUDGE,
    };
    true
}
