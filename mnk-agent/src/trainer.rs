use crate::{
    agent::Agent,
    agent_provider::AgentProvider,
    agents::{
        linear_q::{initial_theta, LinearQAgent, LinearQProvider, SharedTheta},
        random::RandomProvider,
    },
    config::{AgentConfigError, AgentOptions},
    engine::{Engine, EngineError},
    turn_log::{TurnLog, TurnLogError},
};
use mnk_core::{
    board::Mark,
    config::{GameConfig, GameConfigError},
    game::GameResult,
};
use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, path::PathBuf, rc::Rc};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum TrainError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    AgentConfig(#[from] AgentConfigError),
    #[error(transparent)]
    GameConfig(#[from] GameConfigError),
    #[error(transparent)]
    TurnLog(#[from] TurnLogError),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opponent {
    /// Two linear agents learning into the same weights.
    #[default]
    SelfPlay,
    Random,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainOptions {
    pub game: GameConfig,
    pub agent: AgentOptions,
    pub opponent: Opponent,
    pub log_file: Option<PathBuf>,
    /// Games between evaluations; 0 turns evaluation off.
    pub eval_every: usize,
    pub eval_games: usize,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            agent: AgentOptions::default(),
            opponent: Opponent::default(),
            log_file: None,
            eval_every: 100,
            eval_games: 20,
        }
    }
}

/// Game outcomes seen from the learning agent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
}

impl Evaluation {
    pub fn add(&mut self, result: GameResult, learner: Mark) {
        match result {
            GameResult::Win(winner) if winner == learner => self.wins += 1,
            GameResult::Win(_) => self.losses += 1,
            GameResult::Draw => self.draws += 1,
        }
    }

    pub fn games(&self) -> usize {
        self.wins + self.losses + self.draws
    }
}

/// Plays training games into one weight vector and periodically measures it
/// against the random agent.
pub struct Trainer {
    options: TrainOptions,
    theta: SharedTheta,
    td_errors: td_error_window::TdErrorWindow,
    games_played: usize,
}

impl Trainer {
    pub fn new(options: TrainOptions) -> Result<Self, TrainError> {
        options.game.validate()?;
        options.agent.validate()?;

        let theta = initial_theta(&options.agent, options.game.win_length)?;

        Ok(Self {
            options,
            theta: Rc::new(RefCell::new(theta)),
            td_errors: td_error_window::TdErrorWindow::new(),
            games_played: 0,
        })
    }

    pub fn options(&self) -> &TrainOptions {
        &self.options
    }

    pub fn theta(&self) -> SharedTheta {
        self.theta.clone()
    }

    pub fn weight_names(&self) -> Result<Vec<String>, TrainError> {
        Ok(self.provider().create(None)?.weight_names())
    }

    pub fn games_played(&self) -> usize {
        self.games_played
    }

    /// Mean absolute TD error of the most recent updates.
    pub fn recent_td_error(&self) -> f64 {
        self.td_errors.mean()
    }

    /// Plays `games` training games; the result counts are from the point of
    /// view of X in self play and of the linear agent otherwise.
    pub fn train(&mut self, games: usize) -> Result<Evaluation, TrainError> {
        let mut turn_log = match &self.options.log_file {
            Some(path) => Some(TurnLog::create(path)?),
            None => None,
        };
        let mut results = Evaluation::default();

        for _ in 0..games {
            let game_no = self.games_played;
            let (result, learner) = self.play_training_game(game_no, turn_log.as_mut())?;

            results.add(result, learner);
            self.games_played += 1;

            debug!(game_no, result = ?result, "training game finished");

            let eval_every = self.options.eval_every;
            if eval_every != 0 && self.games_played % eval_every == 0 {
                let evaluation = self.evaluate_many(self.options.eval_games)?;
                info!(
                    games = self.games_played,
                    wins = evaluation.wins,
                    losses = evaluation.losses,
                    draws = evaluation.draws,
                    td_error = self.td_errors.mean(),
                    "evaluation against random agent"
                );
            }
        }

        Ok(results)
    }

    fn provider(&self) -> LinearQProvider {
        LinearQProvider::new(
            self.options.game.win_length,
            self.options.agent.clone(),
            self.theta.clone(),
        )
    }

    fn play_training_game(
        &mut self,
        game_no: usize,
        turn_log: Option<&mut TurnLog>,
    ) -> Result<(GameResult, Mark), TrainError> {
        let seed = self.options.agent.seed;
        let mut learner = self.provider().create(derive_seed(seed, 2 * game_no as u64))?;

        let (result, learner_mark) = match self.options.opponent {
            Opponent::SelfPlay => {
                let mut other = self
                    .provider()
                    .create(derive_seed(seed, 2 * game_no as u64 + 1))?;
                let result = play(&self.options.game, &mut learner, &mut other, turn_log, game_no)?;
                self.record_td_errors(&other);
                (result, Mark::X)
            }
            Opponent::Random => {
                let mut other =
                    RandomProvider.create_agent(derive_seed(seed, 2 * game_no as u64 + 1))?;
                play_against(
                    &self.options.game,
                    &mut learner,
                    other.as_mut(),
                    game_no % 2 == 0,
                    turn_log,
                    game_no,
                )?
            }
        };

        self.record_td_errors(&learner);

        Ok((result, learner_mark))
    }

    fn record_td_errors(&mut self, agent: &LinearQAgent) {
        for error in agent.td_errors() {
            self.td_errors.add(error.abs());
        }
    }

    /// Plays `games` independent games of a frozen, greedy copy of the current
    /// weights against the random agent, in parallel.
    pub fn evaluate_many(&self, games: usize) -> Result<Evaluation, TrainError> {
        let theta = self.theta.borrow().clone();
        let options = self.options.agent.greedy();
        let config = &self.options.game;

        let outcomes = (0..games)
            .into_par_iter()
            .map(|index| evaluate(config, &options, &theta, index))
            .collect::<Result<Vec<_>, TrainError>>()?;

        let mut evaluation = Evaluation::default();
        for (result, learner) in outcomes {
            evaluation.add(result, learner);
        }

        Ok(evaluation)
    }
}

/// One evaluation game; the linear agent plays X in even games.
fn evaluate(
    config: &GameConfig,
    options: &AgentOptions,
    theta: &Array1<f64>,
    index: usize,
) -> Result<(GameResult, Mark), TrainError> {
    let seed = options.seed.map(|seed| !seed);
    let agent_options = AgentOptions {
        seed: derive_seed(seed, 2 * index as u64),
        ..options.clone()
    };
    let mut learner = LinearQAgent::new(
        config.win_length,
        agent_options,
        Rc::new(RefCell::new(theta.clone())),
    )?;
    let mut other = RandomProvider.create_agent(derive_seed(seed, 2 * index as u64 + 1))?;

    play_against(config, &mut learner, other.as_mut(), index % 2 == 0, None, index)
}

fn play_against(
    config: &GameConfig,
    learner: &mut LinearQAgent,
    other: &mut dyn Agent,
    learner_first: bool,
    turn_log: Option<&mut TurnLog>,
    game_no: usize,
) -> Result<(GameResult, Mark), TrainError> {
    if learner_first {
        Ok((play(config, learner, other, turn_log, game_no)?, Mark::X))
    } else {
        Ok((play(config, other, learner, turn_log, game_no)?, Mark::O))
    }
}

fn play(
    config: &GameConfig,
    first: &mut dyn Agent,
    second: &mut dyn Agent,
    turn_log: Option<&mut TurnLog>,
    game_no: usize,
) -> Result<GameResult, EngineError> {
    let engine = Engine::new(config.clone(), first, second)?;
    let mut engine = match turn_log {
        Some(turn_log) => engine.with_turn_log(turn_log, game_no),
        None => engine,
    };

    engine.start()
}

/// Independent, reproducible seed for the `stream`-th agent of a run.
fn derive_seed(seed: Option<u64>, stream: u64) -> Option<u64> {
    seed.map(|seed| seed ^ stream.wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15))
}

mod td_error_window {
    use std::collections::VecDeque;

    const WINDOW: usize = 100;

    pub struct TdErrorWindow {
        errors: VecDeque<f64>,
    }

    impl TdErrorWindow {
        pub fn new() -> Self {
            Self {
                errors: VecDeque::with_capacity(WINDOW),
            }
        }

        pub fn add(&mut self, error: f64) {
            if WINDOW <= self.errors.len() {
                self.errors.pop_front();
            }

            self.errors.push_back(error);
        }

        pub fn mean(&self) -> f64 {
            if self.errors.is_empty() {
                return 0.0;
            }

            self.errors.iter().sum::<f64>() / self.errors.len() as f64
        }
    }

}
