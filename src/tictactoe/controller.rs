//! Match controller: routes input, AI and network events into the board
//!
//! One controller per tic-tac-toe screen. It owns the board, the scoreboard,
//! the pending AI deliberation and (in online mode) the replication session.
//! Everything arrives as an `Event`; time only moves when the host sends
//! `Event::Tick`.

use rand::Rng;

use super::board::{Board, Mark, Outcome};
use super::{heuristic, minimax};
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::tictactoe::AI_DELAY_MS;
use crate::error::{MoveError, SessionError};
use crate::net::{ReplicationSession, SessionEvent, Transport};
use crate::scheduler::TaskSlot;
use crate::settings::{TicTacToeMode, Variant};

/// Local player's mark against the AI
pub const HUMAN: Mark = Mark::X;
pub const AI: Mark = Mark::O;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Local click/tap on a cell
    MoveRequested(usize),
    /// Move delivered by the peer outside the transport queue
    RemoteMoveReceived(usize),
    /// Host clock, milliseconds since any fixed origin
    Tick(u64),
    ResetRequested,
    VariantSelected(Variant),
}

/// Results across matches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub x_wins: u32,
    pub o_wins: u32,
    pub draws: u32,
}

impl Scoreboard {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Won(win) if win.winner == Mark::X => self.x_wins += 1,
            Outcome::Won(_) => self.o_wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::InProgress | Outcome::Abandoned => {}
        }
    }
}

pub struct TicTacToeController {
    board: Board,
    mode: TicTacToeMode,
    scores: Scoreboard,
    ai_task: TaskSlot,
    now_ms: u64,
    session: Option<ReplicationSession>,
}

impl TicTacToeController {
    pub fn new(mode: TicTacToeMode, variant: Variant) -> Self {
        Self {
            board: Board::new(variant),
            mode,
            scores: Scoreboard::default(),
            ai_task: TaskSlot::new(),
            now_ms: 0,
            session: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mode(&self) -> TicTacToeMode {
        self.mode
    }

    pub fn scores(&self) -> Scoreboard {
        self.scores
    }

    pub fn reset_scores(&mut self) {
        self.scores = Scoreboard::default();
    }

    pub fn session(&self) -> Option<&ReplicationSession> {
        self.session.as_ref()
    }

    /// AI deliberation delay is running
    pub fn is_ai_thinking(&self) -> bool {
        self.ai_task.is_pending()
    }

    /// Switch mode and start a fresh match. Leaving online mode disconnects.
    pub fn set_mode(&mut self, mode: TicTacToeMode) {
        if mode == self.mode {
            return;
        }
        if mode != TicTacToeMode::Online {
            self.drop_session();
        }
        log::info!("Tic-tac-toe mode: {:?}", mode);
        self.mode = mode;
        self.ai_task.cancel();
        self.board.reset();
    }

    /// Open a room for a remote opponent and return its code
    pub fn host_room<R: Rng + ?Sized>(
        &mut self,
        transport: Box<dyn Transport>,
        rng: &mut R,
    ) -> Result<String, SessionError> {
        self.set_mode(TicTacToeMode::Online);
        self.drop_session();
        let mut session = ReplicationSession::new(transport);
        let result = session.host(rng);
        self.session = Some(session);
        result
    }

    /// Join a remote opponent's room by code
    pub fn join_room(&mut self, transport: Box<dyn Transport>, code: &str) -> Result<(), SessionError> {
        self.set_mode(TicTacToeMode::Online);
        self.drop_session();
        let mut session = ReplicationSession::new(transport);
        let result = session.join(code);
        self.session = Some(session);
        result
    }

    /// Leave the online match and clear the board
    pub fn disconnect(&mut self) {
        self.drop_session();
        self.board.reset();
    }

    /// Apply one event. Rejected moves return `Err` and change nothing.
    pub fn handle(&mut self, event: Event, audio: &mut dyn AudioSink) -> Result<Outcome, MoveError> {
        match event {
            Event::MoveRequested(index) => self.local_move(index, audio)?,
            Event::RemoteMoveReceived(index) => {
                let session = self.session.as_mut().ok_or(MoveError::NotConnected)?;
                session.receive_move(index, &mut self.board)?;
                self.after_move(audio);
            }
            Event::Tick(now_ms) => self.tick(now_ms, audio),
            Event::ResetRequested => {
                self.ai_task.cancel();
                self.board.reset();
                audio.play(SoundEffect::Click);
                if let Some(session) = self.session.as_mut().filter(|s| s.is_connected())
                    && let Err(e) = session.send_reset(&mut self.board)
                {
                    log::warn!("Could not send reset: {}", e);
                }
            }
            Event::VariantSelected(variant) => {
                self.ai_task.cancel();
                self.board = Board::new(variant);
                audio.play(SoundEffect::Click);
                if let Some(session) = self.session.as_mut().filter(|s| s.is_connected())
                    && let Err(e) = session.send_variant(variant, &mut self.board)
                {
                    log::warn!("Could not send variant: {}", e);
                }
            }
        }
        Ok(self.board.outcome())
    }

    fn local_move(&mut self, index: usize, audio: &mut dyn AudioSink) -> Result<(), MoveError> {
        if self.ai_task.is_pending() {
            return Err(MoveError::AiThinking);
        }

        match self.mode {
            TicTacToeMode::TwoPlayer => {
                let side = self.board.turn();
                self.board.apply_move(index, side)?;
                self.after_move(audio);
            }
            TicTacToeMode::VsAi => {
                self.board.apply_move(index, HUMAN)?;
                self.after_move(audio);
                if !self.board.is_over() {
                    self.ai_task.schedule(self.now_ms, AI_DELAY_MS);
                }
            }
            TicTacToeMode::Online => {
                let mark = self
                    .session
                    .as_ref()
                    .filter(|s| s.is_connected())
                    .and_then(ReplicationSession::mark)
                    .ok_or(MoveError::NotConnected)?;
                self.board.apply_move(index, mark)?;
                // Scored locally even if the peer never hears of it
                self.after_move(audio);
                if let Some(session) = self.session.as_mut()
                    && let Err(e) = session.send_move(index, &mut self.board)
                {
                    log::warn!("Move {} not delivered: {}", index, e);
                    audio.play(SoundEffect::Disconnect);
                }
            }
        }
        Ok(())
    }

    fn tick(&mut self, now_ms: u64, audio: &mut dyn AudioSink) {
        self.now_ms = now_ms;

        if let Some(session) = self.session.as_mut() {
            for event in session.poll(&mut self.board) {
                self.on_session_event(event, audio);
            }
        }

        if self.ai_task.poll(now_ms) {
            self.play_ai(audio);
        }
    }

    fn play_ai(&mut self, audio: &mut dyn AudioSink) {
        if self.board.is_over() || self.board.turn() != AI {
            return;
        }
        let choice = match self.board.variant() {
            Variant::Classic => minimax::best_move(self.board.cells(), AI),
            Variant::Infinite => heuristic::best_move(self.board.cells(), self.board.history(), AI),
        };
        let Some(index) = choice else {
            return;
        };
        match self.board.apply_move(index, AI) {
            Ok(_) => self.after_move(audio),
            Err(e) => log::warn!("AI move {} rejected: {}", index, e),
        }
    }

    fn on_session_event(&mut self, event: SessionEvent, audio: &mut dyn AudioSink) {
        match event {
            SessionEvent::Connected { .. } => audio.play(SoundEffect::Connect),
            SessionEvent::MoveApplied { .. } => self.after_move(audio),
            SessionEvent::RemoteReset | SessionEvent::VariantChanged(_) => {
                audio.play(SoundEffect::Click)
            }
            SessionEvent::Disconnected => audio.play(SoundEffect::Disconnect),
        }
    }

    /// Sounds and scoring for a placement that was just accepted
    fn after_move(&mut self, audio: &mut dyn AudioSink) {
        audio.play(SoundEffect::Place);
        let outcome = self.board.outcome();
        match outcome {
            Outcome::Won(win) => {
                log::info!("{:?} wins on {:?}", win.winner, win.line);
                let local_win = match self.mode {
                    TicTacToeMode::TwoPlayer => true,
                    TicTacToeMode::VsAi => win.winner == HUMAN,
                    TicTacToeMode::Online => {
                        self.session.as_ref().and_then(|s| s.mark()) == Some(win.winner)
                    }
                };
                audio.play(if local_win {
                    SoundEffect::Win
                } else {
                    SoundEffect::GameOver
                });
            }
            Outcome::Draw => {
                log::info!("Draw");
                audio.play(SoundEffect::Draw);
            }
            Outcome::InProgress | Outcome::Abandoned => return,
        }
        self.scores.record(outcome);
    }

    fn drop_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.disconnect();
        }
    }
}
