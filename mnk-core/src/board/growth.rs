use super::{Action, Board};
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of fully empty rows/columns between each board edge and the
/// nearest occupied cell. All zero on an empty board.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Margins {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

/// Rows/columns added to each side by [`Board::grow`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Padding {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrowthError {
    /// The pad `win_length - margin` came out negative.
    #[error("{side} margin {margin} exceeds win length {win_length}")]
    ExcessMargin {
        side: Side,
        margin: usize,
        win_length: usize,
    },
}

impl Board {
    pub fn margins(&self) -> Margins {
        let row_occupied =
            |r: usize| (0..self.width).any(|c| !self.cells[r * self.width + c].is_empty());
        let column_occupied =
            |c: usize| (0..self.height).any(|r| !self.cells[r * self.width + c].is_empty());

        Margins {
            top: (0..self.height).position(row_occupied).unwrap_or(0),
            bottom: (0..self.height).rev().position(row_occupied).unwrap_or(0),
            left: (0..self.width).position(column_occupied).unwrap_or(0),
            right: (0..self.width).rev().position(column_occupied).unwrap_or(0),
        }
    }

    /// Pads every side with `win_length - margin` empty rows/columns so that a
    /// line can still be completed in any direction from the occupied area.
    ///
    /// A margin wider than `win_length` is reported instead of clamped, and
    /// leaves the board unchanged.
    pub fn grow(&mut self, win_length: usize) -> Result<Padding, GrowthError> {
        let margins = self.margins();
        let pad = |side: Side, margin: usize| {
            win_length
                .checked_sub(margin)
                .ok_or(GrowthError::ExcessMargin {
                    side,
                    margin,
                    win_length,
                })
        };

        let padding = Padding {
            top: pad(Side::Top, margins.top)?,
            bottom: pad(Side::Bottom, margins.bottom)?,
            left: pad(Side::Left, margins.left)?,
            right: pad(Side::Right, margins.right)?,
        };

        if padding != Padding::default() {
            *self = self.padded(padding);
        }

        Ok(padding)
    }

    pub fn padded(&self, padding: Padding) -> Board {
        let mut board = Board::new(
            padding.top + self.height + padding.bottom,
            padding.left + self.width + padding.right,
        );

        for (action, mark) in self.occupied() {
            board.set(
                Action::new(action.row + padding.top, action.col + padding.left),
                mark,
            );
        }

        board
    }
}
