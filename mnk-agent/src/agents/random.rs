use crate::{
    agent::{Agent, AgentError},
    agent_provider::AgentProvider,
    config::AgentConfigError,
};
use mnk_core::{board::Action, state::GameState};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Plays a uniformly random empty cell.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self { rng }
    }
}

impl Agent for RandomAgent {
    fn get_action(&mut self, state: &GameState) -> Result<Action, AgentError> {
        let legal_moves = state.board().legal_moves();
        legal_moves
            .choose(&mut self.rng)
            .copied()
            .ok_or(AgentError::NoLegalMoves)
    }

    fn win(&mut self, _state: &GameState) -> Result<(), AgentError> {
        Ok(())
    }

    fn loss(&mut self, _state: &GameState) -> Result<(), AgentError> {
        Ok(())
    }

    fn draw(&mut self, _state: &GameState) -> Result<(), AgentError> {
        Ok(())
    }

    fn learn_params(&self) -> String {
        "random".to_owned()
    }
}

pub struct RandomProvider;

impl AgentProvider for RandomProvider {
    fn name(&self) -> String {
        "random".to_owned()
    }

    fn create_agent(&self, seed: Option<u64>) -> Result<Box<dyn Agent>, AgentConfigError> {
        Ok(Box::new(RandomAgent::new(seed)))
    }
}
