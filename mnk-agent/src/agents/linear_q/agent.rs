use super::{
    action_info::ActionInfo,
    learning::{td_step, LearnError},
};
use crate::{
    agent::{Agent, AgentError},
    config::{AgentConfigError, AgentOptions},
    features::FeatureExtractor,
    policy::{EpsilonGreedyPolicy, Policy},
};
use mnk_core::{
    board::{Action, Board},
    state::GameState,
};
use ndarray::Array1;
use std::{cell::RefCell, rc::Rc};
use tracing::debug;

/// Weight vector that two agents of one game may learn into together.
pub type SharedTheta = Rc<RefCell<Array1<f64>>>;

/// Initial weights for `options`: the configured vector or zeros, bias
/// included.
pub fn initial_theta(
    options: &AgentOptions,
    win_length: usize,
) -> Result<Array1<f64>, AgentConfigError> {
    let expected = options.features.build(win_length).features_count() + 1;

    match &options.theta {
        Some(theta) if theta.len() != expected => Err(AgentConfigError::WeightsLength {
            expected,
            actual: theta.len(),
        }),
        Some(theta) => Ok(Array1::from_vec(theta.clone())),
        None => Ok(Array1::zeros(expected)),
    }
}

/// Scores every empty cell with a linear function of the board features and
/// learns the weights with a ridge-regularized temporal-difference rule.
pub struct LinearQAgent {
    options: AgentOptions,
    extractor: Box<dyn FeatureExtractor>,
    policy: Box<dyn Policy>,
    theta: SharedTheta,
    history: Vec<ActionInfo>,
    theta_snapshots: Vec<Array1<f64>>,
    td_errors: Vec<f64>,
}

impl LinearQAgent {
    pub fn new(
        win_length: usize,
        options: AgentOptions,
        theta: SharedTheta,
    ) -> Result<Self, AgentConfigError> {
        options.validate()?;

        let extractor = options.features.build(win_length);
        let expected = extractor.features_count() + 1;
        let actual = theta.borrow().len();

        if actual != expected {
            return Err(AgentConfigError::WeightsLength { expected, actual });
        }

        let policy = Box::new(EpsilonGreedyPolicy::new(options.epsilon, options.seed));

        Ok(Self {
            options,
            extractor,
            policy,
            theta,
            history: Vec::new(),
            theta_snapshots: Vec::new(),
            td_errors: Vec::new(),
        })
    }

    /// Agent with weights of its own.
    pub fn standalone(win_length: usize, options: AgentOptions) -> Result<Self, AgentConfigError> {
        let theta = initial_theta(&options, win_length)?;
        Self::new(win_length, options, Rc::new(RefCell::new(theta)))
    }

    pub fn with_policy(self, policy: Box<dyn Policy>) -> Self {
        Self { policy, ..self }
    }

    pub fn options(&self) -> &AgentOptions {
        &self.options
    }

    pub fn theta(&self) -> SharedTheta {
        self.theta.clone()
    }

    /// Names of the weights, bias first.
    pub fn weight_names(&self) -> Vec<String> {
        std::iter::once("bias".to_owned())
            .chain(self.extractor.feature_names())
            .collect()
    }

    /// Chosen candidates of this agent, oldest first.
    pub fn history(&self) -> &[ActionInfo] {
        &self.history
    }

    /// Weights as they were before each update.
    pub fn theta_snapshots(&self) -> &[Array1<f64>] {
        &self.theta_snapshots
    }

    pub fn td_errors(&self) -> &[f64] {
        &self.td_errors
    }

    /// Every legal move of the mover with the position it leads to and its
    /// value under the current weights.
    pub fn score_candidates(&self, state: &GameState) -> Vec<ActionInfo> {
        let theta = self.theta.borrow();
        let board = state.board();
        let mover = state.mover();

        board
            .legal_moves()
            .into_iter()
            .map(|action| {
                let next = board.with_mark(action, mover);
                let features = with_bias(&self.extractor.features(&next, mover));
                let value = theta.dot(&features);
                ActionInfo::new(action, next, features, value)
            })
            .collect()
    }

    fn learn(&mut self, reward: f64, future: f64) -> Result<(), LearnError> {
        let previous = self.history.last().ok_or(LearnError::MissingComputedState)?;
        let mut theta = self.theta.borrow_mut();

        self.theta_snapshots.push(theta.clone());
        let update = td_step(
            &mut theta,
            previous.features(),
            reward,
            future,
            self.options.td_params(),
        )?;
        self.td_errors.push(update.error());

        Ok(())
    }

    fn move_reward(&self) -> Result<f64, LearnError> {
        let previous = self.history.last().ok_or(LearnError::MissingComputedState)?;
        let per_move = self.options.rewards.per_move;

        if !self.options.inf_field {
            return Ok(per_move);
        }

        Ok(centering_reward(previous.board(), previous.action(), per_move))
    }

    fn finish(&mut self, reward: f64) -> Result<(), AgentError> {
        if self.options.learning {
            self.learn(reward, 0.0)?;
        }

        Ok(())
    }
}

fn with_bias(features: &[u32]) -> Array1<f64> {
    std::iter::once(1.0)
        .chain(features.iter().map(|&count| f64::from(count)))
        .collect()
}

/// Per-move reward that punishes drifting away from the other stones: moves
/// at least 10 cells from their centroid earn `floor(10 - distance)`.
pub fn centering_reward(board: &Board, action: Action, per_move: f64) -> f64 {
    let others = board
        .occupied()
        .into_iter()
        .map(|(cell, _)| cell)
        .filter(|&cell| cell != action)
        .collect::<Vec<_>>();

    if others.is_empty() {
        return per_move;
    }

    let count = others.len() as f64;
    let (rows, cols) = others.iter().fold((0.0, 0.0), |(rows, cols), cell| {
        (rows + cell.row as f64, cols + cell.col as f64)
    });
    let distance = (action.row as f64 - rows / count).hypot(action.col as f64 - cols / count);

    if distance < 10.0 {
        per_move
    } else {
        (10.0 - distance).floor()
    }
}

impl Agent for LinearQAgent {
    fn get_action(&mut self, state: &GameState) -> Result<Action, AgentError> {
        let mut candidates = self.score_candidates(state);

        if candidates.is_empty() {
            return Err(AgentError::NoLegalMoves);
        }

        if self.options.learning && !self.history.is_empty() {
            let future = candidates
                .iter()
                .map(ActionInfo::value)
                .fold(f64::NEG_INFINITY, f64::max);
            let reward = self.move_reward()?;
            self.learn(reward, future)?;
        }

        let index = self
            .policy
            .get_action(state, &candidates)
            .ok_or(AgentError::NoLegalMoves)?;
        let chosen = candidates.swap_remove(index);
        let action = chosen.action();

        debug!(
            player = state.mover().name(),
            row = action.row,
            col = action.col,
            value = chosen.value(),
            candidates = candidates.len() + 1,
            "chose action"
        );

        self.history.push(chosen);
        Ok(action)
    }

    fn win(&mut self, _state: &GameState) -> Result<(), AgentError> {
        self.finish(self.options.rewards.win)
    }

    fn loss(&mut self, _state: &GameState) -> Result<(), AgentError> {
        self.finish(self.options.rewards.loss)
    }

    fn draw(&mut self, _state: &GameState) -> Result<(), AgentError> {
        self.finish(self.options.rewards.draw)
    }

    fn learn_params(&self) -> String {
        format!(
            "alfa={} gamma={} lambda={} epsilon={} learning={}",
            self.options.alfa,
            self.options.gamma,
            self.options.lambda,
            self.options.epsilon,
            self.options.learning
        )
    }
}
