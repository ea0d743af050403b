use crate::agents::linear_q::LearnError;
use mnk_core::{board::Action, state::GameState};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("no legal moves left")]
    NoLegalMoves,
    #[error(transparent)]
    Learn(#[from] LearnError),
    #[error("failed to read move: {0}")]
    Input(#[from] std::io::Error),
}

/// A participant in a game.
///
/// The engine asks for one action per turn and, once the game ends, calls
/// exactly one of `win`, `loss` or `draw` with the final state.
pub trait Agent {
    fn get_action(&mut self, state: &GameState) -> Result<Action, AgentError>;
    fn win(&mut self, state: &GameState) -> Result<(), AgentError>;
    fn loss(&mut self, state: &GameState) -> Result<(), AgentError>;
    fn draw(&mut self, state: &GameState) -> Result<(), AgentError>;

    /// Parameters written to the turn log next to every move.
    fn learn_params(&self) -> String {
        String::new()
    }
}
