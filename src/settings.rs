//! Player preferences
//!
//! Persisted as JSON, separately from any game state.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// AI difficulty tiers for the paddle game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// One row of the AI difficulty table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiTuning {
    /// Maximum paddle travel per tick
    pub speed: f32,
    /// Proportional gain applied to the distance to target
    pub reaction: f32,
    /// Per-rally aim offset is drawn from [-error_margin, error_margin]
    pub error_margin: f32,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn tuning(&self) -> AiTuning {
        match self {
            Difficulty::Easy => AiTuning {
                speed: 3.0,
                reaction: 0.35,
                error_margin: 40.0,
            },
            Difficulty::Medium => AiTuning {
                speed: 4.5,
                reaction: 0.55,
                error_margin: 18.0,
            },
            Difficulty::Hard => AiTuning {
                speed: 6.0,
                reaction: 0.85,
                error_margin: 5.0,
            },
        }
    }
}

/// Who drives the right paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PongMode {
    #[default]
    VsAi,
    TwoPlayer,
}

/// Who plays the O side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicTacToeMode {
    #[default]
    VsAi,
    TwoPlayer,
    Online,
}

/// Tic-tac-toe rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Finite board, draws possible
    #[default]
    Classic,
    /// Each side keeps at most three marks; the oldest vanishes
    Infinite,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Infinite => "infinite",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Variant::Classic),
            "infinite" => Some(Variant::Infinite),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    // === Paddle game ===
    pub pong_difficulty: Difficulty,
    pub pong_mode: PongMode,

    // === Tic-tac-toe ===
    pub ttt_mode: TicTacToeMode,
    pub ttt_variant: Variant,

    // === Audio ===
    pub muted: bool,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from disk, falling back to defaults when the file is missing
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }
}
