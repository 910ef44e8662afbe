//! Predictive AI paddle
//!
//! While the ball comes toward the AI it extrapolates the arrival height and
//! folds it across the walls. While the ball moves away it drifts back to
//! the middle. Either way the per-rally aim offset is added, and the paddle
//! chases the target with the difficulty's gain and speed cap.

use super::state::{Ball, Paddle, PaddleWorld, Side};
use crate::consts::pong::{AI_DEAD_ZONE, FIELD_HEIGHT};
use crate::settings::AiTuning;

/// Mirror `y` back into `[0, height]` as if it bounced off both walls
pub fn fold_into_field(y: f32, height: f32) -> f32 {
    let period = 2.0 * height;
    let m = y.rem_euclid(period);
    if m > height { period - m } else { m }
}

/// Predicted arrival height at the paddle face, or `None` if the ball is
/// not heading toward `side`
pub fn predict_arrival(ball: &Ball, paddle: &Paddle, side: Side) -> Option<f32> {
    if ball.vel.x * side.inbound_dir() <= 0.0 {
        return None;
    }
    let face_x = match side {
        Side::Left => paddle.x + paddle.width,
        Side::Right => paddle.x,
    };
    let ticks = ((face_x - ball.pos.x) / ball.vel.x).max(0.0);
    Some(fold_into_field(ball.pos.y + ball.vel.y * ticks, FIELD_HEIGHT))
}

/// Where `side`'s paddle center wants to be this tick
pub fn target_y(world: &PaddleWorld, side: Side) -> f32 {
    let paddle = match side {
        Side::Left => &world.left,
        Side::Right => &world.right,
    };
    let base = predict_arrival(&world.ball, paddle, side).unwrap_or(FIELD_HEIGHT / 2.0);
    base + world.ai_offset(side)
}

/// Move the paddle center toward `target` with proportional gain and a speed cap
pub fn chase(paddle: &mut Paddle, target: f32, tuning: &AiTuning) {
    let diff = target - paddle.center_y();
    if diff.abs() <= AI_DEAD_ZONE {
        return;
    }
    let step = (diff * tuning.reaction).clamp(-tuning.speed, tuning.speed);
    paddle.move_by(step);
}

/// Run one AI step for `side`
pub fn drive(world: &mut PaddleWorld, side: Side) {
    let target = target_y(world, side);
    let tuning = world.difficulty.tuning();
    let paddle = match side {
        Side::Left => &mut world.left,
        Side::Right => &mut world.right,
    };
    chase(paddle, target, &tuning);
}
