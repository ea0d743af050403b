use mnk_core::board::{Action, Board};
use ndarray::Array1;

/// One scored candidate move.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionInfo {
    action: Action,
    board: Board,
    /// Feature row with the bias term in front.
    features: Array1<f64>,
    value: f64,
}

impl ActionInfo {
    pub fn new(action: Action, board: Board, features: Array1<f64>, value: f64) -> Self {
        Self {
            action,
            board,
            features,
            value,
        }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Position after the move.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn features(&self) -> &Array1<f64> {
        &self.features
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}
