//! Wire messages exchanged between two tic-tac-toe peers
//!
//! Every message is fire-and-forget JSON, e.g. `{"type":"move","index":4}`.

use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::settings::Variant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    /// Place the sender's mark at `index`
    Move { index: usize },
    /// Both sides clear their game independently
    Reset,
    /// Switch rule set, then reset
    Variant { variant: Variant },
}

impl Message {
    pub fn encode(&self) -> String {
        // Plain enum of integers and unit variants: serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn decode(payload: &str) -> Result<Self, TransportError> {
        serde_json::from_str(payload).map_err(|e| TransportError::Decode(e.to_string()))
    }
}
