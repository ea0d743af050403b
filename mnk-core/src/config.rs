use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_WIN_LENGTH: usize = 5;
pub const DEFAULT_MAX_TURNS: usize = 200;

/// Board shape and rules of one game.
///
/// With both dimensions missing the game is played on an unbounded board.
/// Exactly one missing dimension is rejected by [`GameConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub height: Option<usize>,
    pub width: Option<usize>,
    pub win_length: usize,
    /// Turn after which the game is declared a draw.
    pub max_turns: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            height: None,
            width: None,
            win_length: DEFAULT_WIN_LENGTH,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameConfigError {
    #[error("win length must be at least 2, got {win_length}")]
    WinLengthTooShort { win_length: usize },
    #[error("win length {win_length} does not fit a {height}x{width} board")]
    WinLengthExceedsBoard {
        win_length: usize,
        height: usize,
        width: usize,
    },
    #[error("height and width must both be set or both be left out, got {height:?}x{width:?}")]
    HalfOpenBoard {
        height: Option<usize>,
        width: Option<usize>,
    },
    #[error("turn cap must be at least 1")]
    ZeroTurnCap,
}

impl GameConfig {
    pub fn finite(height: usize, width: usize, win_length: usize) -> Self {
        Self {
            height: Some(height),
            width: Some(width),
            win_length,
            ..Default::default()
        }
    }

    pub fn unbounded(win_length: usize) -> Self {
        Self {
            win_length,
            ..Default::default()
        }
    }

    pub fn with_max_turns(self, max_turns: usize) -> Self {
        Self { max_turns, ..self }
    }

    /// Both dimensions open: the first stone is placed automatically and the
    /// board grows after every move.
    pub fn is_unbounded(&self) -> bool {
        self.height.is_none() && self.width.is_none()
    }

    /// Size of an open dimension before the first growth.
    pub fn initial_extent(&self) -> usize {
        self.win_length * 2 + 1
    }

    pub fn initial_height(&self) -> usize {
        self.height.unwrap_or_else(|| self.initial_extent())
    }

    pub fn initial_width(&self) -> usize {
        self.width.unwrap_or_else(|| self.initial_extent())
    }

    pub fn validate(&self) -> Result<(), GameConfigError> {
        if self.win_length < 2 {
            return Err(GameConfigError::WinLengthTooShort {
                win_length: self.win_length,
            });
        }

        if self.height.is_none() != self.width.is_none() {
            return Err(GameConfigError::HalfOpenBoard {
                height: self.height,
                width: self.width,
            });
        }

        if self.max_turns == 0 {
            return Err(GameConfigError::ZeroTurnCap);
        }

        let height = self.initial_height();
        let width = self.initial_width();

        if height.min(width) < self.win_length {
            return Err(GameConfigError::WinLengthExceedsBoard {
                win_length: self.win_length,
                height,
                width,
            });
        }

        Ok(())
    }
}
