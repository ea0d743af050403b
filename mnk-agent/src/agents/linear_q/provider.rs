use super::agent::{LinearQAgent, SharedTheta};
use crate::{
    agent::Agent,
    agent_provider::AgentProvider,
    config::{AgentConfigError, AgentOptions},
};

/// Creates linear agents that all learn into the same weights.
pub struct LinearQProvider {
    win_length: usize,
    options: AgentOptions,
    theta: SharedTheta,
}

impl LinearQProvider {
    pub fn new(win_length: usize, options: AgentOptions, theta: SharedTheta) -> Self {
        Self {
            win_length,
            options,
            theta,
        }
    }

    pub fn theta(&self) -> SharedTheta {
        self.theta.clone()
    }

    pub fn create(&self, seed: Option<u64>) -> Result<LinearQAgent, AgentConfigError> {
        let options = AgentOptions {
            seed: seed.or(self.options.seed),
            ..self.options.clone()
        };

        LinearQAgent::new(self.win_length, options, self.theta.clone())
    }
}

impl AgentProvider for LinearQProvider {
    fn name(&self) -> String {
        "linear-q".to_owned()
    }

    fn create_agent(&self, seed: Option<u64>) -> Result<Box<dyn Agent>, AgentConfigError> {
        Ok(Box::new(self.create(seed)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::linear_q::initial_theta;
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn test_agents_share_weights_and_seed_override() {
        let options = AgentOptions {
            seed: Some(3),
            ..Default::default()
        };
        let theta = Rc::new(RefCell::new(initial_theta(&options, 4).unwrap()));
        let provider = LinearQProvider::new(4, options, theta);

        let first = provider.create(None).unwrap();
        let second = provider.create(Some(9)).unwrap();

        assert_eq!(first.options().seed, Some(3));
        assert_eq!(second.options().seed, Some(9));
        assert!(Rc::ptr_eq(&first.theta(), &provider.theta()));
        assert!(Rc::ptr_eq(&second.theta(), &provider.theta()));
        assert_eq!(provider.name(), "linear-q");
    }
}
