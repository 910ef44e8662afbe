//! Tic-tac-toe: board rules, AI opponents and the match controller

pub mod board;
pub mod controller;
pub mod heuristic;
pub mod minimax;

pub use board::{Board, Cells, Mark, MoveHistory, Outcome, WIN_LINES, WinInfo};
pub use controller::{Event, Scoreboard, TicTacToeController};
