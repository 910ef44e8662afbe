//! Remote tic-tac-toe: room codes, wire messages and the replication session

pub mod protocol;
pub mod room;
pub mod session;
pub mod transport;

pub use protocol::Message;
pub use room::{generate_code, normalize_code, peer_id};
pub use session::{ReplicationSession, Role, SessionEvent, SessionState};
pub use transport::{LoopbackHub, LoopbackTransport, Transport, TransportEvent};
