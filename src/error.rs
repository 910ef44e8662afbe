//! Error types
//!
//! Nothing here is fatal to the host: every error leaves the affected game
//! instance unchanged or recoverable by a reset.

use thiserror::Error;

/// A tic-tac-toe move that was refused (no state change happened)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("game is already over")]
    GameOver,
    #[error("cell {0} is already occupied")]
    Occupied(usize),
    #[error("cell index {0} is out of range")]
    OutOfRange(usize),
    #[error("not your turn")]
    NotYourTurn,
    #[error("AI is still thinking")]
    AiThinking,
    #[error("no opponent connected")]
    NotConnected,
}

/// Failure reported by (or detected on) the transport collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Room identifier is already taken by another host
    #[error("room {0} is unavailable")]
    RoomUnavailable(String),
    /// No host is listening under this identifier
    #[error("peer {0} is unavailable")]
    PeerUnavailable(String),
    #[error("connection closed")]
    Closed,
    #[error("send failed: {0}")]
    Send(String),
    #[error("malformed message: {0}")]
    Decode(String),
}

/// Replication session lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid room code {0:?}")]
    InvalidRoomCode(String),
    /// Host/join called on a session that already left `Idle`
    #[error("session already started")]
    AlreadyActive,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Settings / best-score persistence failures
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}
