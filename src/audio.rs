//! Sound effect notifications
//!
//! The core never synthesizes audio. Simulations report discrete events, the
//! host maps them to `SoundEffect`s and hands them to an `AudioSink`. Sinks are
//! fire-and-forget: nothing they do can influence game logic.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Ball hits top/bottom wall
    WallBounce,
    /// Ball hits a paddle
    PaddleHit,
    /// A point was scored
    Score,
    /// Match or game started
    GameStart,
    /// Match won by the local player
    Win,
    /// Match or game lost
    GameOver,
    /// Snake ate food
    Eat,
    /// Snake changed heading
    Turn,
    /// Pause toggled
    Pause,
    /// Tic-tac-toe mark placed
    Place,
    /// Tic-tac-toe ended in a draw
    Draw,
    /// UI acknowledgement (reset, room created)
    Click,
    /// Peer connected
    Connect,
    /// Peer disconnected
    Disconnect,
}

/// Receiver for sound notifications
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Writes effects to the log instead of a speaker (headless hosts)
#[derive(Debug, Default, Clone)]
pub struct LogAudio {
    muted: bool,
}

impl LogAudio {
    pub fn new(muted: bool) -> Self {
        Self { muted }
    }

    /// Toggle mute, returning the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        if !self.muted {
            log::trace!("sfx: {:?}", effect);
        }
    }
}

/// Records effects in order (useful for tests and replays)
impl AudioSink for Vec<SoundEffect> {
    fn play(&mut self, effect: SoundEffect) {
        self.push(effect);
    }
}

impl<T: AudioSink + ?Sized> AudioSink for &mut T {
    fn play(&mut self, effect: SoundEffect) {
        (**self).play(effect);
    }
}
