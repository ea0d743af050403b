use crate::{agents::linear_q::TdParams, features::FeatureKind};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration file read by the binaries.
pub const CONFIG_FILE: &str = "mnk.toml";

/// `mnk.toml` overlaid with `MNK_` environment variables; nested keys are
/// separated by `__`, e.g. `MNK_AGENT__EPSILON=0.1`.
pub fn figment(path: impl AsRef<Path>) -> Figment {
    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("MNK_").split("__"))
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentConfigError {
    #[error("option `{name}` is out of range: {value}")]
    OutOfRange { name: &'static str, value: f64 },
    #[error("weight vector has {actual} entries, expected {expected}")]
    WeightsLength { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rewards {
    pub per_move: f64,
    pub win: f64,
    pub loss: f64,
    pub draw: f64,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            per_move: -1.0,
            win: 100.0,
            loss: -100.0,
            draw: -20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentOptions {
    pub alfa: f64,
    pub gamma: f64,
    pub lambda: f64,
    pub epsilon: f64,
    pub seed: Option<u64>,
    pub learning: bool,
    /// Rewards moves close to the center of the stones; meant for growing
    /// boards.
    pub inf_field: bool,
    pub features: FeatureKind,
    /// Initial weights, bias first. Zeros when absent.
    pub theta: Option<Vec<f64>>,
    pub rewards: Rewards,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            alfa: 0.5,
            gamma: 0.5,
            lambda: 1.0,
            epsilon: 0.05,
            seed: None,
            learning: true,
            inf_field: false,
            features: FeatureKind::default(),
            theta: None,
            rewards: Rewards::default(),
        }
    }
}

impl AgentOptions {
    pub fn validate(&self) -> Result<(), AgentConfigError> {
        let checks = [
            ("alfa", self.alfa, self.alfa >= 0.0),
            ("gamma", self.gamma, (0.0..=1.0).contains(&self.gamma)),
            ("lambda", self.lambda, self.lambda >= 0.0),
            ("epsilon", self.epsilon, (0.0..=1.0).contains(&self.epsilon)),
        ];

        for (name, value, valid) in checks {
            if !valid || !value.is_finite() {
                return Err(AgentConfigError::OutOfRange { name, value });
            }
        }

        Ok(())
    }

    pub fn td_params(&self) -> TdParams {
        TdParams {
            alfa: self.alfa,
            gamma: self.gamma,
            lambda: self.lambda,
        }
    }

    /// Frozen copy for evaluation games.
    pub fn greedy(&self) -> Self {
        Self {
            learning: false,
            epsilon: 0.0,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = AgentOptions::default();

        assert_eq!(options.validate(), Ok(()));
        assert_eq!(options.rewards.draw, -20.0);
        assert_eq!(options.features, FeatureKind::NumRows);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let options = AgentOptions {
            epsilon: 1.5,
            ..Default::default()
        };
        assert_eq!(
            options.validate(),
            Err(AgentConfigError::OutOfRange {
                name: "epsilon",
                value: 1.5,
            })
        );

        let options = AgentOptions {
            lambda: f64::NAN,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_extract_partial_table() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                    alfa = 0.25
                    features = "cartesian"
                    theta = [1.0, 2.0]

                    [rewards]
                    draw = -5.0
                "#,
            )?;
            jail.set_env("MNK_EPSILON", "0.2");

            let options: AgentOptions = figment(CONFIG_FILE).extract()?;

            assert_eq!(options.alfa, 0.25);
            assert_eq!(options.epsilon, 0.2);
            assert_eq!(options.features, FeatureKind::Cartesian);
            assert_eq!(options.theta, Some(vec![1.0, 2.0]));
            assert_eq!(options.rewards.draw, -5.0);
            assert_eq!(options.rewards.win, 100.0);
            assert_eq!(options.gamma, 0.5);
            Ok(())
        });
    }

    #[test]
    fn test_greedy_copy() {
        let options = AgentOptions::default().greedy();

        assert!(!options.learning);
        assert_eq!(options.epsilon, 0.0);
        assert_eq!(options.alfa, 0.5);
    }
}
