//! Peer-to-peer replication of a tic-tac-toe match
//!
//! `Idle -> Hosting -> Connected -> Closed` for the side that creates the room,
//! `Idle -> Joining -> Connected -> Closed` for the side that types the code.
//! A session never reopens: playing again means creating a new one.
//!
//! The session is the only writer of remote moves into the `Board`. Each
//! incoming message is applied as soon as it is handled and re-checks the
//! board first, because the peer may have acted on a stale view.

use rand::Rng;

use super::protocol::Message;
use super::room::{generate_code, normalize_code, peer_id};
use super::transport::{Transport, TransportEvent};
use crate::error::{MoveError, SessionError, TransportError};
use crate::settings::Variant;
use crate::tictactoe::{Board, Mark, Outcome, WinInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Host,
    Guest,
}

impl Role {
    /// Host always plays X and moves first
    pub fn mark(&self) -> Mark {
        match self {
            Role::Host => Mark::X,
            Role::Guest => Mark::O,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// Room published, waiting for a guest
    Hosting,
    /// Connecting to a host's room
    Joining,
    Connected,
    Closed,
}

/// Something the game layer should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Connected { mark: Mark },
    /// A remote move was accepted
    MoveApplied { index: usize, outcome: Outcome },
    RemoteReset,
    VariantChanged(Variant),
    Disconnected,
}

pub struct ReplicationSession {
    transport: Box<dyn Transport>,
    state: SessionState,
    role: Option<Role>,
    mark: Option<Mark>,
    room_code: Option<String>,
    status: String,
}

impl ReplicationSession {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            state: SessionState::Idle,
            role: None,
            mark: None,
            room_code: None,
            status: String::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Local mark, assigned once the peer connects
    pub fn mark(&self) -> Option<Mark> {
        self.mark
    }

    pub fn room_code(&self) -> Option<&str> {
        self.room_code.as_deref()
    }

    /// Human-readable connection status
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Create a room and wait for a guest. Returns the room code to share.
    ///
    /// A code collision is retried once with a fresh code.
    pub fn host<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String, SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyActive);
        }

        let mut code = generate_code(rng);
        let mut result = self.transport.listen(&peer_id(&code));
        if let Err(TransportError::RoomUnavailable(_)) = result {
            log::warn!("Room {} is taken, retrying with a new code", code);
            code = generate_code(rng);
            result = self.transport.listen(&peer_id(&code));
        }
        if let Err(e) = result {
            return Err(self.fail_setup(e));
        }

        log::info!("Hosting room {}", code);
        self.role = Some(Role::Host);
        self.state = SessionState::Hosting;
        self.status = format!("Room {} - waiting for opponent", code);
        self.room_code = Some(code.clone());
        Ok(code)
    }

    /// Connect to a host's room
    pub fn join(&mut self, input: &str) -> Result<(), SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyActive);
        }
        let code = normalize_code(input)?;

        if let Err(e) = self.transport.connect(&peer_id(&code)) {
            return Err(self.fail_setup(e));
        }

        log::info!("Joining room {}", code);
        self.role = Some(Role::Guest);
        self.state = SessionState::Joining;
        self.status = format!("Connecting to {}...", code);
        self.room_code = Some(code);
        Ok(())
    }

    /// Give up waiting for a peer
    pub fn cancel(&mut self) {
        if matches!(self.state, SessionState::Hosting | SessionState::Joining) {
            self.transport.close();
            self.state = SessionState::Closed;
            self.status = "Cancelled".to_string();
            log::info!("Online session cancelled");
        }
    }

    /// Explicit local disconnect
    pub fn disconnect(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.transport.close();
        self.state = SessionState::Closed;
        self.mark = None;
        self.status = "Disconnected".to_string();
        log::info!("Disconnected from room {:?}", self.room_code);
    }

    /// True if the local player may originate a move right now
    pub fn can_move(&self, board: &Board) -> bool {
        self.is_connected() && !board.is_over() && self.mark == Some(board.turn())
    }

    /// Drain and apply every pending transport event
    pub fn poll(&mut self, board: &mut Board) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.transport.poll() {
            if let Some(session_event) = self.handle_transport_event(event, board) {
                events.push(session_event);
            }
        }
        events
    }

    /// Apply one transport callback
    pub fn handle_transport_event(
        &mut self,
        event: TransportEvent,
        board: &mut Board,
    ) -> Option<SessionEvent> {
        match event {
            TransportEvent::Open => self.on_open(board),
            TransportEvent::Data(payload) => {
                if !self.is_connected() {
                    return None;
                }
                match Message::decode(&payload) {
                    Ok(message) => self.on_message(message, board),
                    Err(e) => {
                        log::warn!("Ignoring message from peer: {}", e);
                        None
                    }
                }
            }
            TransportEvent::Closed => self.on_lost("Opponent disconnected".to_string(), board),
            TransportEvent::Error(e) => {
                log::warn!("Transport error: {}", e);
                let status = match e {
                    TransportError::PeerUnavailable(_) => "Room not found".to_string(),
                    other => format!("Connection error: {}", other),
                };
                self.transport.close();
                self.on_lost(status, board)
            }
        }
    }

    /// Apply a move from the peer. Stale or duplicate moves are refused
    /// without touching the board.
    pub fn receive_move(&mut self, index: usize, board: &mut Board) -> Result<Option<WinInfo>, MoveError> {
        let Some(mark) = self.mark.filter(|_| self.is_connected()) else {
            return Err(MoveError::NotConnected);
        };
        board.apply_move(index, mark.opponent())
    }

    pub fn send_move(&mut self, index: usize, board: &mut Board) -> Result<(), SessionError> {
        self.send(Message::Move { index }, board)
    }

    pub fn send_reset(&mut self, board: &mut Board) -> Result<(), SessionError> {
        self.send(Message::Reset, board)
    }

    pub fn send_variant(&mut self, variant: Variant, board: &mut Board) -> Result<(), SessionError> {
        self.send(Message::Variant { variant }, board)
    }

    fn send(&mut self, message: Message, board: &mut Board) -> Result<(), SessionError> {
        if !self.is_connected() {
            return Err(TransportError::Closed.into());
        }
        if let Err(e) = self.transport.send(&message.encode()) {
            log::warn!("Send failed: {}", e);
            self.transport.close();
            self.on_lost(format!("Connection error: {}", e), board);
            return Err(e.into());
        }
        Ok(())
    }

    fn on_open(&mut self, board: &mut Board) -> Option<SessionEvent> {
        if !matches!(self.state, SessionState::Hosting | SessionState::Joining) {
            return None;
        }
        let role = self.role?;
        let mark = role.mark();
        self.state = SessionState::Connected;
        self.mark = Some(mark);
        self.status = format!("Connected - you are {:?}", mark);
        log::info!("Peer connected, playing {:?}", mark);

        board.reset();
        if role == Role::Host {
            // Guest adopts the host's rule set
            let variant = board.variant();
            if self.send(Message::Variant { variant }, board).is_err() {
                return Some(SessionEvent::Disconnected);
            }
        }
        Some(SessionEvent::Connected { mark })
    }

    fn on_message(&mut self, message: Message, board: &mut Board) -> Option<SessionEvent> {
        match message {
            Message::Move { index } => match self.receive_move(index, board) {
                Ok(_) => Some(SessionEvent::MoveApplied {
                    index,
                    outcome: board.outcome(),
                }),
                Err(e) => {
                    log::debug!("Ignoring remote move {}: {}", index, e);
                    None
                }
            },
            Message::Reset => {
                board.reset();
                Some(SessionEvent::RemoteReset)
            }
            Message::Variant { variant } => {
                *board = Board::new(variant);
                Some(SessionEvent::VariantChanged(variant))
            }
        }
    }

    fn on_lost(&mut self, status: String, board: &mut Board) -> Option<SessionEvent> {
        if self.state == SessionState::Closed {
            return None;
        }
        if self.state == SessionState::Connected {
            board.abandon();
        }
        log::info!("Session closed: {}", status);
        self.state = SessionState::Closed;
        self.mark = None;
        self.status = status;
        Some(SessionEvent::Disconnected)
    }

    fn fail_setup(&mut self, error: TransportError) -> SessionError {
        log::warn!("Could not start online session: {}", error);
        self.state = SessionState::Closed;
        self.status = match &error {
            TransportError::PeerUnavailable(_) => "Room not found".to_string(),
            other => format!("Connection error: {}", other),
        };
        error.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::transport::{EndpointId, LoopbackHub, LoopbackTransport};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Peer {
        session: ReplicationSession,
        board: Board,
        hub: LoopbackHub,
        endpoint: EndpointId,
    }

    impl Peer {
        fn on_hub(hub: &LoopbackHub, variant: Variant) -> Self {
            let transport = hub.endpoint();
            Self {
                endpoint: transport.id(),
                session: ReplicationSession::new(Box::new(transport)),
                board: Board::new(variant),
                hub: hub.clone(),
            }
        }

        /// Fault this peer's own connection
        fn fail(&self, error: TransportError) {
            self.hub.inject_error(self.endpoint, error);
        }

        fn poll(&mut self) -> Vec<SessionEvent> {
            self.session.poll(&mut self.board)
        }

        fn play(&mut self, index: usize) {
            assert!(self.session.can_move(&self.board));
            let mark = self.session.mark().unwrap();
            self.board.apply_move(index, mark).unwrap();
            self.session.send_move(index, &mut self.board).unwrap();
        }
    }

    fn connected(variant: Variant) -> (Peer, Peer) {
        let hub = LoopbackHub::new();
        let mut host = Peer::on_hub(&hub, variant);
        let mut guest = Peer::on_hub(&hub, Variant::Classic);
        let mut rng = Pcg32::seed_from_u64(1);
        let code = host.session.host(&mut rng).unwrap();
        assert_eq!(host.session.state(), SessionState::Hosting);

        guest.session.join(&code.to_lowercase()).unwrap();
        assert_eq!(guest.session.state(), SessionState::Joining);

        assert_eq!(host.poll(), vec![SessionEvent::Connected { mark: Mark::X }]);
        assert_eq!(
            guest.poll(),
            vec![
                SessionEvent::Connected { mark: Mark::O },
                SessionEvent::VariantChanged(variant)
            ]
        );
        (host, guest)
    }

    #[test]
    fn test_handshake_syncs_variant() {
        let (host, guest) = connected(Variant::Infinite);
        assert_eq!(guest.board.variant(), Variant::Infinite);
        assert_eq!(host.session.role(), Some(Role::Host));
        assert_eq!(guest.session.mark(), Some(Mark::O));
    }

    #[test]
    fn test_moves_replicate() {
        let (mut host, mut guest) = connected(Variant::Classic);
        host.play(4);
        assert_eq!(
            guest.poll(),
            vec![SessionEvent::MoveApplied {
                index: 4,
                outcome: Outcome::InProgress
            }]
        );
        guest.play(0);
        host.poll();
        assert_eq!(host.board, guest.board);
        assert_eq!(host.board.turn(), Mark::X);
    }

    #[test]
    fn test_turn_is_enforced_on_both_sides() {
        let (mut host, mut guest) = connected(Variant::Classic);
        assert!(!guest.session.can_move(&guest.board));

        // A misbehaving guest sends out of turn: host ignores it
        guest.session.send_move(3, &mut guest.board).unwrap();
        assert!(host.poll().is_empty());
        assert_eq!(host.board.get(3), None);
    }

    #[test]
    fn test_stale_move_is_a_noop() {
        let (mut host, mut guest) = connected(Variant::Classic);
        host.play(4);
        guest.poll();
        let before = guest.board.clone();

        // Duplicate delivery of the same move
        assert_eq!(
            guest.session.receive_move(4, &mut guest.board),
            Err(MoveError::Occupied(4))
        );
        assert_eq!(guest.board, before);
    }

    #[test]
    fn test_move_after_game_over_is_a_noop() {
        let (mut host, mut guest) = connected(Variant::Classic);
        for (who, index) in [(0, 0), (1, 3), (0, 1), (1, 4), (0, 2)] {
            if who == 0 {
                host.play(index);
                guest.poll();
            } else {
                guest.play(index);
                host.poll();
            }
        }
        assert!(guest.board.is_over());
        let before = guest.board.clone();
        assert_eq!(
            guest.session.receive_move(5, &mut guest.board),
            Err(MoveError::GameOver)
        );
        assert_eq!(guest.board, before);
    }

    #[test]
    fn test_reset_and_variant_messages() {
        let (mut host, mut guest) = connected(Variant::Classic);
        host.play(0);
        guest.poll();

        host.board.reset();
        host.session.send_reset(&mut host.board).unwrap();
        assert_eq!(guest.poll(), vec![SessionEvent::RemoteReset]);
        assert_eq!(guest.board.get(0), None);

        guest.board = Board::new(Variant::Infinite);
        guest
            .session
            .send_variant(Variant::Infinite, &mut guest.board)
            .unwrap();
        assert_eq!(
            host.poll(),
            vec![SessionEvent::VariantChanged(Variant::Infinite)]
        );
        assert_eq!(host.board.variant(), Variant::Infinite);
    }

    #[test]
    fn test_peer_close_abandons_match() {
        let (mut host, mut guest) = connected(Variant::Classic);
        host.play(4);
        guest.poll();

        host.session.disconnect();
        assert_eq!(guest.poll(), vec![SessionEvent::Disconnected]);
        assert_eq!(guest.session.state(), SessionState::Closed);
        assert_eq!(guest.board.outcome(), Outcome::Abandoned);
        assert_eq!(guest.session.status(), "Opponent disconnected");

        // Closed sessions never reopen
        assert_eq!(guest.session.join("ABCDE"), Err(SessionError::AlreadyActive));
    }

    #[test]
    fn test_transport_error_closes_session() {
        let (mut host, mut guest) = connected(Variant::Classic);
        host.play(0);
        guest.poll();

        guest.fail(TransportError::Send("reset by peer".into()));
        assert_eq!(guest.poll(), vec![SessionEvent::Disconnected]);
        assert_eq!(guest.board.outcome(), Outcome::Abandoned);
        assert!(guest.session.status().starts_with("Connection error"));
        assert!(!guest.session.can_move(&guest.board));

        // Our close reaches the host as a plain disconnect
        assert_eq!(host.poll(), vec![SessionEvent::Disconnected]);
        assert_eq!(
            host.session.send_move(1, &mut host.board),
            Err(SessionError::Transport(TransportError::Closed))
        );
    }

    #[test]
    fn test_join_unknown_room() {
        let hub = LoopbackHub::new();
        let mut session = ReplicationSession::new(Box::new(hub.endpoint()));
        let err = session.join("zzzzz").unwrap_err();
        assert!(matches!(
            err,
            SessionError::Transport(TransportError::PeerUnavailable(_))
        ));
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(session.status(), "Room not found");
    }

    #[test]
    fn test_short_code_rejected_before_connecting() {
        let hub = LoopbackHub::new();
        let mut session = ReplicationSession::new(Box::new(hub.endpoint()));
        assert!(matches!(
            session.join(" x "),
            Err(SessionError::InvalidRoomCode(_))
        ));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_room_collision_retries_once() {
        let hub = LoopbackHub::new();
        // Squat on the first code a seeded rng will produce
        let mut rng = Pcg32::seed_from_u64(42);
        let first = generate_code(&mut rng);
        let mut squatter = hub.endpoint();
        squatter.listen(&peer_id(&first)).unwrap();

        let mut session = ReplicationSession::new(Box::new(hub.endpoint()));
        let mut rng = Pcg32::seed_from_u64(42);
        let code = session.host(&mut rng).unwrap();
        assert_ne!(code, first);
        assert_eq!(session.state(), SessionState::Hosting);
    }

    #[test]
    fn test_cancel_while_waiting() {
        let (a, _b) = LoopbackTransport::pair();
        let mut session = ReplicationSession::new(Box::new(a));
        let mut rng = Pcg32::seed_from_u64(3);
        session.host(&mut rng).unwrap();
        session.cancel();
        assert_eq!(session.state(), SessionState::Closed);
    }
}
