//! Grid snake simulation
//!
//! Ticks run at a speed-controlled interval fed by host time through
//! `advance`. Calling into a paused or finished world is always a no-op.

pub mod state;
pub mod tick;

pub use state::{Cell, Direction, GameOverReason, GridWorld, SnakePhase};
pub use tick::{SnakeEvent, SnakeInput, advance, handle_input, tick};
