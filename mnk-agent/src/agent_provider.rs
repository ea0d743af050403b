use crate::{agent::Agent, config::AgentConfigError};

pub trait AgentProvider {
    fn name(&self) -> String;
    /// `seed` overrides the provider's configured seed for this instance.
    fn create_agent(&self, seed: Option<u64>) -> Result<Box<dyn Agent>, AgentConfigError>;
}
