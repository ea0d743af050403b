use crate::board::{Board, Mark};
use std::fmt::Display;

/// Read-only snapshot of a game handed to agents and views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    mover: Mark,
    ended: bool,
    winner: Mark,
}

impl GameState {
    pub fn new(board: Board, mover: Mark, ended: bool, winner: Mark) -> Self {
        Self {
            board,
            mover,
            ended,
            winner,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player to move; on a terminal state, the player who moved last.
    pub fn mover(&self) -> Mark {
        self.mover
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// `Mark::Empty` while the game runs and on a draw.
    pub fn winner(&self) -> Mark {
        self.winner
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "current player: {}", self.mover)?;
        writeln!(f, "game ended: {}", self.ended)?;
        writeln!(f, "winner: {}", self.winner)?;
        write!(f, "{}", self.board)
    }
}
