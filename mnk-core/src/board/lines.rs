use super::{Board, Mark};

/// Running (owner, length) pair while walking one line of the board.
#[derive(Debug, Default, Clone, Copy)]
struct Streak {
    owner: Mark,
    length: usize,
}

impl Streak {
    fn push(&mut self, mark: Mark) {
        if mark.is_empty() {
            *self = Streak::default();
        } else if mark == self.owner {
            self.length += 1;
        } else {
            self.owner = mark;
            self.length = 1;
        }
    }
}

impl Board {
    /// Returns the owner of the first `win_length` streak found, or `Mark::Empty`.
    ///
    /// Lines are scanned rows first, then columns, then the down-right
    /// diagonals (starting on the top edge, then on the left edge), then the
    /// down-left diagonals (top edge, then right edge). Scanning stops at the
    /// first complete streak.
    pub fn winner(&self, win_length: usize) -> Mark {
        let h = self.height as isize;
        let w = self.width as isize;
        let k = win_length as isize;

        let rows = (0..h).map(|r| (r, 0, 0, 1));
        let columns = (0..w).map(|c| (0, c, 1, 0));
        let down_right_top = (0..w - (k - 1)).map(|c| (0, c, 1, 1));
        let down_right_left = (1..h - (k - 1)).map(|r| (r, 0, 1, 1));
        let down_left_top = (k - 1..w).map(|c| (0, c, 1, -1));
        let down_left_right = (1..h - (k - 1)).map(move |r| (r, w - 1, 1, -1));

        rows.chain(columns)
            .chain(down_right_top)
            .chain(down_right_left)
            .chain(down_left_top)
            .chain(down_left_right)
            .find_map(|(row, col, d_row, d_col)| {
                self.scan_line(row, col, d_row, d_col, win_length)
            })
            .unwrap_or(Mark::Empty)
    }

    fn scan_line(
        &self,
        mut row: isize,
        mut col: isize,
        d_row: isize,
        d_col: isize,
        win_length: usize,
    ) -> Option<Mark> {
        let mut streak = Streak::default();

        while let Some(mark) = self.get_signed(row, col) {
            streak.push(mark);

            if streak.length == win_length {
                return Some(streak.owner);
            }

            row += d_row;
            col += d_col;
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Action;

    fn board_from(rows: &[&str]) -> Board {
        let mut board = Board::new(rows.len(), rows[0].len());

        for (r, line) in rows.iter().enumerate() {
            for (c, symbol) in line.chars().enumerate() {
                let mark = match symbol {
                    'X' => Mark::X,
                    'O' => Mark::O,
                    _ => Mark::Empty,
                };
                board.set(Action::new(r, c), mark);
            }
        }

        board
    }

    fn transposed(board: &Board) -> Board {
        let mut result = Board::new(board.width(), board.height());
        for (action, mark) in board.occupied() {
            result.set(Action::new(action.col, action.row), mark);
        }
        result
    }

    fn flipped_horizontally(board: &Board) -> Board {
        let mut result = Board::new(board.height(), board.width());
        for (action, mark) in board.occupied() {
            result.set(Action::new(action.row, board.width() - 1 - action.col), mark);
        }
        result
    }

    fn flipped_vertically(board: &Board) -> Board {
        let mut result = Board::new(board.height(), board.width());
        for (action, mark) in board.occupied() {
            result.set(Action::new(board.height() - 1 - action.row, action.col), mark);
        }
        result
    }

    #[test]
    fn test_five_in_a_row_wins_four_does_not() {
        let mut board = Board::new(9, 9);
        for c in 2..6 {
            board.set(Action::new(4, c), Mark::X);
        }
        assert_eq!(board.winner(5), Mark::Empty);

        board.set(Action::new(4, 6), Mark::X);
        assert_eq!(board.winner(5), Mark::X);
    }

    #[test]
    fn test_streak_interrupted_by_other_mark() {
        let board = board_from(&["XXOXX", ".....", "....."]);
        assert_eq!(board.winner(3), Mark::Empty);

        let board = board_from(&["XXOOO", ".....", "....."]);
        assert_eq!(board.winner(3), Mark::O);
    }

    #[test]
    fn test_all_directions() {
        let cases = [
            (vec!["....", "OOO.", "....", "...."], Mark::O),
            (vec!["..X.", "..X.", "..X.", "...."], Mark::X),
            (vec!["....", "X...", ".X..", "..X."], Mark::X),
            (vec!["..O.", ".O..", "O...", "...."], Mark::O),
            (vec!["....", "...X", "..X.", ".X.."], Mark::X),
            (vec![".O..", "..O.", "...O", "...."], Mark::O),
        ];

        for (rows, expected) in cases {
            let board = board_from(&rows);
            assert_eq!(board.winner(3), expected, "board:\n{}", board);
        }
    }

    #[test]
    fn test_rectangular_boards() {
        let board = board_from(&["......", "...O..", "..O...", ".O...."]);
        assert_eq!(board.winner(3), Mark::O);

        let board = board_from(&["X..", ".X.", "..X", "...", "..."]);
        assert_eq!(board.winner(3), Mark::X);
    }

    #[test]
    fn test_win_is_invariant_under_symmetries() {
        let boards = [
            board_from(&["X....", ".X...", "..X..", "...O.", "O...O"]),
            board_from(&["..O..", ".O...", "O..X.", "...X.", "....."]),
            board_from(&["OOXO.", ".....", "XXX..", ".....", "....."]),
            board_from(&["X.O..", ".XO..", "..X..", ".....", "....."]),
            board_from(&["X.O..", ".XO..", ".....", ".....", "....."]),
        ];

        for board in boards {
            let expected = board.winner(3);
            assert_eq!(transposed(&board).winner(3), expected);
            assert_eq!(flipped_horizontally(&board).winner(3), expected);
            assert_eq!(flipped_vertically(&board).winner(3), expected);
        }
    }

    #[test]
    fn test_empty_board_has_no_winner() {
        assert_eq!(Board::new(1, 1).winner(2), Mark::Empty);
        assert_eq!(Board::new(7, 3).winner(3), Mark::Empty);
    }
}
