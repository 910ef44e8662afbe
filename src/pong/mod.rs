//! Paddle-and-ball simulation
//!
//! Deterministic given a seed and an input sequence:
//! - Fixed timestep only (velocities are per tick)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod state;
pub mod tick;

pub use state::{Axis, Ball, MatchPhase, Paddle, PaddleWorld, Side};
pub use tick::{PongEvent, TickInput, tick};
