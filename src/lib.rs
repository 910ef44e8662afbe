//! Neon Arcade - game core for a small arcade suite
//!
//! Core modules:
//! - `pong`: Fixed-step paddle/ball simulation with a predictive AI paddle
//! - `snake`: Grid snake simulation with speed-controlled ticks
//! - `tictactoe`: Board rules (classic + infinite), minimax and heuristic solvers
//! - `net`: Peer-to-peer move replication for remote tic-tac-toe
//! - `scheduler`: Fixed-step accumulator, interval timer, cancellable delays
//!
//! Rendering, audio synthesis and storage are collaborators: the core only
//! emits `audio::SoundEffect`s and reports best scores through `highscores`.

pub mod audio;
pub mod error;
pub mod highscores;
pub mod net;
pub mod pong;
pub mod scheduler;
pub mod settings;
pub mod snake;
pub mod tictactoe;

pub use audio::{AudioSink, SoundEffect};
pub use error::{MoveError, SessionError, SettingsError, TransportError};
pub use highscores::BestScore;
pub use settings::{Difficulty, PongMode, Settings, TicTacToeMode, Variant};

/// Game configuration constants
pub mod consts {
    /// Paddle game tuning
    pub mod pong {
        /// Playfield dimensions
        pub const FIELD_WIDTH: f32 = 700.0;
        pub const FIELD_HEIGHT: f32 = 500.0;

        /// Paddle geometry and placement
        pub const PADDLE_WIDTH: f32 = 12.0;
        pub const PADDLE_HEIGHT: f32 = 90.0;
        pub const PADDLE_MARGIN: f32 = 20.0;
        /// Human paddle speed (units per tick)
        pub const PADDLE_SPEED: f32 = 6.0;

        /// Ball defaults
        pub const BALL_RADIUS: f32 = 8.0;
        pub const BALL_START_SPEED: f32 = 5.0;
        /// Speed added on every paddle hit
        pub const BALL_SPEED_STEP: f32 = 0.3;
        pub const BALL_MAX_SPEED: f32 = 9.0;
        /// Maximum bounce angle off a paddle (~51 degrees)
        pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::PI / 3.5;
        /// Serve angle is drawn from [-SERVE_SPREAD, SERVE_SPREAD]
        pub const SERVE_SPREAD: f32 = std::f32::consts::PI / 8.0;
        /// Gap left between paddle face and ball after a hit
        pub const HIT_NUDGE: f32 = 1.0;

        pub const WIN_SCORE: u32 = 7;
        pub const TRAIL_LENGTH: usize = 8;

        /// AI paddle ignores targets closer than this to its center
        pub const AI_DEAD_ZONE: f32 = 4.0;

        /// Simulation step the per-tick velocities are tuned for (60 Hz)
        pub const SIM_DT: f32 = 1.0 / 60.0;
        /// Maximum substeps per frame to prevent spiral of death
        pub const MAX_SUBSTEPS: u32 = 8;
    }

    /// Grid snake tuning
    pub mod snake {
        pub const GRID_SIZE: i32 = 20;
        /// Tick interval at the start of a game (ms)
        pub const INITIAL_INTERVAL_MS: u32 = 140;
        /// Interval reduction per food eaten (ms)
        pub const INTERVAL_STEP_MS: u32 = 2;
        /// Fastest allowed tick interval (ms)
        pub const MIN_INTERVAL_MS: u32 = 55;
        pub const FOOD_SCORE: u32 = 10;
    }

    /// Tic-tac-toe tuning
    pub mod tictactoe {
        pub const CELLS: usize = 9;
        /// Live marks per side in the infinite variant
        pub const MARK_CAP: usize = 3;
        /// Artificial AI deliberation delay (ms)
        pub const AI_DELAY_MS: u64 = 350;
    }

    /// Replication tuning
    pub mod net {
        /// Namespace prefix for published room identifiers
        pub const ROOM_PREFIX: &str = "neonarcade-ttt-";
        pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
        pub const ROOM_CODE_LEN: usize = 5;
        /// Shortest code a guest may submit
        pub const MIN_JOIN_CODE_LEN: usize = 3;
    }
}

/// Initialize the logging backend (console on web, env_logger on native).
///
/// Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Initialize the logging backend (console on web, env_logger on native).
///
/// Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
