use crate::{
    board::{Action, Board, GrowthError, Mark, Padding},
    config::{GameConfig, GameConfigError},
    state::GameState,
};
use std::fmt::Display;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GameResult {
    Draw,
    Win(Mark),
}

impl GameResult {
    pub fn winner(self) -> Mark {
        match self {
            GameResult::Draw => Mark::Empty,
            GameResult::Win(mark) => mark,
        }
    }
}

/// Authoritative board and turn order of one game.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    board: Board,
    mover: Mark,
    turn_no: usize,
    game_result: Option<GameResult>,
}

impl Game {
    /// Builds the starting position. On an unbounded board X's first stone is
    /// placed in the center and O moves first.
    pub fn new(config: GameConfig) -> Result<Self, GameConfigError> {
        config.validate()?;

        let mut board = Board::new(config.initial_height(), config.initial_width());
        let mover = if config.is_unbounded() {
            let center = config.win_length;
            board.set(Action::new(center, center), Mark::X);
            Mark::O
        } else {
            Mark::X
        };

        Ok(Self {
            config,
            board,
            mover,
            turn_no: 0,
            game_result: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn win_length(&self) -> usize {
        self.config.win_length
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mover(&self) -> Mark {
        self.mover
    }

    pub fn turn_no(&self) -> usize {
        self.turn_no
    }

    pub fn game_result(&self) -> Option<GameResult> {
        self.game_result
    }

    pub fn is_ended(&self) -> bool {
        self.game_result.is_some()
    }

    pub fn state(&self) -> GameState {
        GameState::new(
            self.board.clone(),
            self.mover,
            self.is_ended(),
            self.game_result.map_or(Mark::Empty, GameResult::winner),
        )
    }
}

#[derive(Debug)]
pub struct ApplyActionResult {
    pub action: Action,
    pub mark: Mark,
    pub game_result: Option<GameResult>,
    /// Rows/columns added by growth; always `None` on a fixed board or at the
    /// end of the game.
    pub padding: Option<Padding>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyActionError {
    #[error("game already ended")]
    GameEnded,
    #[error("action {action} is outside the {height}x{width} board")]
    OutOfRange {
        action: Action,
        height: usize,
        width: usize,
    },
    #[error("cell {action} is already occupied by {mark}")]
    CellOccupied { action: Action, mark: Mark },
    #[error(transparent)]
    Growth(#[from] GrowthError),
}

impl Game {
    pub fn apply_action(&mut self, action: Action) -> Result<ApplyActionResult, ApplyActionError> {
        if self.is_ended() {
            return Err(ApplyActionError::GameEnded);
        }

        let cell = self
            .board
            .get(action)
            .ok_or(ApplyActionError::OutOfRange {
                action,
                height: self.board.height(),
                width: self.board.width(),
            })?;

        if !cell.is_empty() {
            return Err(ApplyActionError::CellOccupied { action, mark: cell });
        }

        let mark = self.mover;
        self.board.set(action, mark);

        let mut padding = None;
        let winner = self.board.winner(self.config.win_length);

        if !winner.is_empty() {
            debug_assert_eq!(winner, mark);
            self.game_result = Some(GameResult::Win(mark));
        } else if !self.board.has_empty() || self.turn_no == self.config.max_turns {
            self.game_result = Some(GameResult::Draw);
        } else {
            if self.config.is_unbounded() {
                match self.board.grow(self.config.win_length) {
                    Ok(grown) => padding = Some(grown),
                    Err(err) => {
                        self.board.set(action, Mark::Empty);
                        return Err(err.into());
                    }
                }
            }

            self.mover = mark.opponent();
            self.turn_no += 1;
        }

        debug!(
            turn = self.turn_no,
            player = mark.name(),
            row = action.row,
            col = action.col,
            result = ?self.game_result,
            "applied action"
        );

        Ok(ApplyActionResult {
            action,
            mark,
            game_result: self.game_result,
            padding,
        })
    }
}

impl Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "turn: {} ({:3})", self.mover.name(), self.turn_no + 1)?;
        writeln!(
            f,
            "state: {}",
            match self.game_result {
                Some(GameResult::Win(mark)) => format!("{} wins", mark.name()),
                Some(GameResult::Draw) => "draw".to_string(),
                None => "in progress".to_string(),
            }
        )?;
        write!(f, "{}", self.board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &mut Game, moves: &[(usize, usize)]) -> Option<GameResult> {
        let mut result = None;
        for &(row, col) in moves {
            result = game.apply_action(Action::new(row, col)).unwrap().game_result;
        }
        result
    }

    #[test]
    fn test_five_in_a_row_ends_the_game() {
        let mut game = Game::new(GameConfig::finite(9, 9, 5)).unwrap();

        let result = play(
            &mut game,
            &[(4, 0), (0, 0), (4, 1), (0, 2), (4, 2), (0, 4), (4, 3)],
        );
        assert_eq!(result, None);
        assert!(!game.is_ended());

        let result = play(&mut game, &[(0, 6), (4, 4)]);
        assert_eq!(result, Some(GameResult::Win(Mark::X)));

        let state = game.state();
        assert!(state.is_ended());
        assert_eq!(state.winner(), Mark::X);
        assert_eq!(state.mover(), Mark::X);
    }

    #[test]
    fn test_rejects_occupied_and_out_of_range_cells() {
        let mut game = Game::new(GameConfig::finite(3, 3, 3)).unwrap();
        game.apply_action(Action::new(1, 1)).unwrap();

        assert_eq!(
            game.apply_action(Action::new(1, 1)).err(),
            Some(ApplyActionError::CellOccupied {
                action: Action::new(1, 1),
                mark: Mark::X,
            })
        );
        assert_eq!(
            game.apply_action(Action::new(3, 0)).err(),
            Some(ApplyActionError::OutOfRange {
                action: Action::new(3, 0),
                height: 3,
                width: 3,
            })
        );
        assert_eq!(game.mover(), Mark::O);
    }

    #[test]
    fn test_full_board_is_a_draw() {
        let mut game = Game::new(GameConfig::finite(3, 3, 3)).unwrap();

        // X O X / X O O / O X X
        let result = play(
            &mut game,
            &[
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 1),
                (1, 0),
                (2, 0),
                (2, 1),
                (1, 2),
                (2, 2),
            ],
        );

        assert_eq!(result, Some(GameResult::Draw));
        assert_eq!(game.state().winner(), Mark::Empty);
        assert_eq!(
            game.apply_action(Action::new(0, 0)).err(),
            Some(ApplyActionError::GameEnded)
        );
    }

    #[test]
    fn test_turn_cap_is_a_draw() {
        let mut game = Game::new(GameConfig::finite(5, 5, 5).with_max_turns(2)).unwrap();

        assert_eq!(play(&mut game, &[(0, 0), (1, 2)]), None);
        assert_eq!(game.turn_no(), 2);
        assert_eq!(play(&mut game, &[(4, 4)]), Some(GameResult::Draw));
    }

    #[test]
    fn test_unbounded_game_starts_in_the_center() {
        let game = Game::new(GameConfig::unbounded(3)).unwrap();

        assert_eq!((game.board().height(), game.board().width()), (7, 7));
        assert_eq!(game.board().get(Action::new(3, 3)), Some(Mark::X));
        assert_eq!(game.mover(), Mark::O);
        assert_eq!(game.turn_no(), 0);
    }

    #[test]
    fn test_unbounded_board_grows_after_each_move() {
        let k = 3;
        let mut game = Game::new(GameConfig::unbounded(k)).unwrap();

        let result = game.apply_action(Action::new(1, 3)).unwrap();

        assert_eq!(
            result.padding,
            Some(Padding {
                top: 2,
                bottom: 0,
                left: 0,
                right: 0,
            })
        );
        assert_eq!((game.board().height(), game.board().width()), (9, 7));
        assert_eq!(game.board().get(Action::new(3, 3)), Some(Mark::O));
        assert_eq!(game.board().get(Action::new(5, 3)), Some(Mark::X));

        let margins = game.board().margins();
        for margin in [margins.top, margins.bottom, margins.left, margins.right] {
            assert!(margin >= k);
        }
    }

    #[test]
    fn test_failed_growth_leaves_the_game_untouched() {
        let mut game = Game::new(GameConfig::unbounded(2)).unwrap();
        game.board = Board::new(9, 9);
        game.mover = Mark::X;

        let error = game.apply_action(Action::new(4, 4)).unwrap_err();

        assert_eq!(
            error,
            ApplyActionError::Growth(GrowthError::ExcessMargin {
                side: crate::board::Side::Top,
                margin: 4,
                win_length: 2,
            })
        );
        assert_eq!(game.board().get(Action::new(4, 4)), Some(Mark::Empty));
        assert_eq!((game.board().height(), game.board().width()), (9, 9));
        assert_eq!(game.mover(), Mark::X);
        assert_eq!(game.turn_no(), 0);
        assert!(!game.is_ended());
    }

    #[test]
    fn test_display_shows_turn_and_state() {
        let mut game = Game::new(GameConfig::finite(3, 3, 3)).unwrap();
        assert!(game.to_string().starts_with("turn: X (  1)\nstate: in progress\n"));

        play(&mut game, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        let rendered = game.to_string();

        assert!(rendered.contains("state: X wins\n"));
        assert!(rendered.ends_with(&game.board().to_string()));
    }
}
