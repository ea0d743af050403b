use crate::{
    agent::{Agent, AgentError},
    turn_log::{TurnLog, TurnLogError},
    view::View,
};
use mnk_core::{
    board::{Action, Mark},
    config::{GameConfig, GameConfigError},
    game::{ApplyActionError, Game, GameResult},
    state::GameState,
};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid move: {0}")]
    InvalidMove(#[from] ApplyActionError),
    #[error("no player plays {0}")]
    UnknownPlayer(Mark),
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error(transparent)]
    TurnLog(#[from] TurnLogError),
    #[error("invalid game configuration: {0}")]
    Config(#[from] GameConfigError),
}

pub struct Player<'a> {
    pub mark: Mark,
    pub agent: &'a mut dyn Agent,
}

/// Drives one game between two agents: asks the mover for an action, commits
/// it, and reports every transition to the view and the turn log.
pub struct Engine<'a> {
    game: Game,
    players: [Player<'a>; 2],
    view: Option<&'a mut dyn View>,
    turn_log: Option<&'a mut TurnLog>,
    game_no: usize,
}

impl<'a> Engine<'a> {
    /// `first` plays X, `second` plays O.
    pub fn new(
        config: GameConfig,
        first: &'a mut dyn Agent,
        second: &'a mut dyn Agent,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            game: Game::new(config)?,
            players: [
                Player {
                    mark: Mark::X,
                    agent: first,
                },
                Player {
                    mark: Mark::O,
                    agent: second,
                },
            ],
            view: None,
            turn_log: None,
            game_no: 0,
        })
    }

    pub fn with_view(self, view: &'a mut dyn View) -> Self {
        Self {
            view: Some(view),
            ..self
        }
    }

    pub fn with_turn_log(self, turn_log: &'a mut TurnLog, game_no: usize) -> Self {
        Self {
            turn_log: Some(turn_log),
            game_no,
            ..self
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Plays the game to the end.
    pub fn start(&mut self) -> Result<GameResult, EngineError> {
        debug!(game_no = self.game_no, config = ?self.game.config(), "game started");
        let state = self.game.state();
        self.update_view(&state);

        loop {
            let state = self.game.state();
            let index = self.player_index(state.mover())?;

            if let Some(turn_log) = self.turn_log.as_deref_mut() {
                turn_log.begin_turn(
                    self.game_no,
                    self.game.turn_no(),
                    state.mover(),
                    state.board().height(),
                    state.board().width(),
                    &self.players[index].agent.learn_params(),
                )?;
            }

            let action = self.players[index].agent.get_action(&state)?;

            if let Some(game_result) = self.apply_action(action)? {
                debug!(
                    game_no = self.game_no,
                    turns = self.game.turn_no() + 1,
                    result = ?game_result,
                    "game ended"
                );
                return Ok(game_result);
            }
        }
    }

    /// Commits the mover's action; on a terminal move every agent receives
    /// exactly one of `win`, `loss` or `draw`.
    pub fn apply_action(&mut self, action: Action) -> Result<Option<GameResult>, EngineError> {
        if let Some(turn_log) = self.turn_log.as_deref_mut() {
            turn_log.end_turn(action)?;
        }

        let result = self.game.apply_action(action)?;
        let state = self.game.state();

        if let Some(game_result) = result.game_result {
            self.notify(game_result, &state)?;
        }

        self.update_view(&state);

        Ok(result.game_result)
    }

    fn notify(&mut self, game_result: GameResult, state: &GameState) -> Result<(), EngineError> {
        for player in &mut self.players {
            match game_result {
                GameResult::Win(winner) if winner == player.mark => player.agent.win(state)?,
                GameResult::Win(_) => player.agent.loss(state)?,
                GameResult::Draw => player.agent.draw(state)?,
            }
        }

        Ok(())
    }

    fn player_index(&self, mark: Mark) -> Result<usize, EngineError> {
        self.players
            .iter()
            .position(|player| player.mark == mark)
            .ok_or(EngineError::UnknownPlayer(mark))
    }

    fn update_view(&mut self, state: &GameState) {
        if let Some(view) = self.view.as_deref_mut() {
            view.update(state);
        }
    }
}
