pub mod agent;
pub mod agent_provider;
pub mod agents;
pub mod config;
pub mod engine;
pub mod features;
pub mod policy;
pub mod trainer;
pub mod turn_log;
pub mod view;
