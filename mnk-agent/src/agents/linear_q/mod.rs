mod action_info;
mod agent;
mod learning;
mod provider;

pub use action_info::ActionInfo;
pub use agent::{centering_reward, initial_theta, LinearQAgent, SharedTheta};
pub use learning::{ridge_direction, td_step, LearnError, TdParams, TdUpdate};
pub use provider::LinearQProvider;
