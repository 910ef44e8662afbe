//! Snake movement tick and timing

use super::state::{Direction, GameOverReason, GridWorld, SnakePhase};
use crate::audio::SoundEffect;
use crate::consts::snake::{FOOD_SCORE, INTERVAL_STEP_MS, MIN_INTERVAL_MS};

/// Discrete player input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeInput {
    /// Start (or restart) a game
    Start,
    DirectionRequested(Direction),
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeEvent {
    Started,
    Turned(Direction),
    Ate { score: u32 },
    GameOver { score: u32, reason: GameOverReason },
    Paused,
    Resumed,
}

impl SnakeEvent {
    pub fn sound(&self) -> SoundEffect {
        match self {
            SnakeEvent::Started => SoundEffect::GameStart,
            SnakeEvent::Turned(_) => SoundEffect::Turn,
            SnakeEvent::Ate { .. } => SoundEffect::Eat,
            SnakeEvent::GameOver { .. } => SoundEffect::GameOver,
            SnakeEvent::Paused | SnakeEvent::Resumed => SoundEffect::Pause,
        }
    }
}

/// Apply one input, returning what changed
pub fn handle_input(world: &mut GridWorld, input: SnakeInput) -> Option<SnakeEvent> {
    match input {
        SnakeInput::Start => {
            world.start();
            Some(SnakeEvent::Started)
        }
        SnakeInput::DirectionRequested(direction) => world
            .request_direction(direction)
            .then_some(SnakeEvent::Turned(direction)),
        SnakeInput::Pause => {
            if !world.toggle_pause() {
                return None;
            }
            Some(match world.phase {
                SnakePhase::Paused => SnakeEvent::Paused,
                _ => SnakeEvent::Resumed,
            })
        }
    }
}

/// Move the snake one cell. No-op unless playing.
pub fn tick(world: &mut GridWorld) -> Option<SnakeEvent> {
    if world.phase != SnakePhase::Playing {
        return None;
    }

    if world.pending.is_opposite(&world.direction) {
        world.pending = world.direction;
    } else {
        world.direction = world.pending;
    }

    let head = world.head()?.step(world.direction);
    if !head.in_bounds(world.grid_size) {
        return Some(game_over(world, GameOverReason::Wall));
    }
    // The tail still counts: it has not moved yet
    if world.body_set.contains(&head) {
        return Some(game_over(world, GameOverReason::SelfCollision));
    }

    world.body.push_front(head);
    world.body_set.insert(head);

    if world.food != Some(head) {
        if let Some(tail) = world.body.pop_back() {
            world.body_set.remove(&tail);
        }
        return None;
    }

    world.score += FOOD_SCORE;
    world.interval_ms = world
        .interval_ms
        .saturating_sub(INTERVAL_STEP_MS)
        .max(MIN_INTERVAL_MS);
    log::debug!(
        "Snake ate at ({}, {}), score {}, interval {}ms",
        head.x,
        head.y,
        world.score,
        world.interval_ms
    );

    world.food = world.random_free_cell();
    if world.food.is_none() {
        return Some(game_over(world, GameOverReason::BoardFull));
    }
    Some(SnakeEvent::Ate { score: world.score })
}

/// Feed elapsed host time and run every tick that became due
pub fn advance(world: &mut GridWorld, elapsed_ms: u32) -> Vec<SnakeEvent> {
    let mut events = Vec::new();
    if world.phase != SnakePhase::Playing {
        return events;
    }

    world.timer.accumulate(elapsed_ms);
    // Interval is re-read every iteration, it shrinks when food is eaten
    while world.timer.take_tick(world.interval_ms) {
        events.extend(tick(world));
        if world.phase != SnakePhase::Playing {
            world.timer.reset();
            break;
        }
    }
    events
}

fn game_over(world: &mut GridWorld, reason: GameOverReason) -> SnakeEvent {
    world.phase = SnakePhase::GameOver;
    world.game_over_reason = Some(reason);
    log::info!("Snake game over ({:?}), score {}", reason, world.score);
    SnakeEvent::GameOver {
        score: world.score,
        reason,
    }
}
