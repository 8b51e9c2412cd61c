//! Configuration for genome creation, mutation and comparison.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Policy used to draw the weight of a freshly created connection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WeightInit {
    /// Uniform draw from `[min, max]`.
    Uniform { min: f64, max: f64 },
    /// Every connection starts with the same weight.
    Constant(f64),
}

impl Default for WeightInit {
    fn default() -> Self {
        Self::Uniform {
            min: -1.0,
            max: 1.0,
        }
    }
}

impl WeightInit {
    /// Draw one weight.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match *self {
            Self::Uniform { min, max } => rng.random_range(min..=max),
            Self::Constant(weight) => weight,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Uniform { min, max } => {
                if !min.is_finite() || !max.is_finite() || min > max {
                    return Err(ConfigError::InvalidWeightRange { min, max });
                }
            }
            Self::Constant(weight) => {
                if !weight.is_finite() {
                    return Err(ConfigError::InvalidWeightRange {
                        min: weight,
                        max: weight,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Configuration for NEAT genome creation, mutation and comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeatConfig {
    /// Number of input nodes in a default genome.
    pub num_inputs: usize,
    /// Number of output nodes in a default genome.
    pub num_outputs: usize,
    /// Enabled flag given to the connections of a default genome.
    pub start_enabled: bool,
    /// Weight policy for the connections of a default genome.
    pub weight_init: WeightInit,
    /// Relative weight of the add-connection strategy.
    pub add_connection_rate: f64,
    /// Relative weight of the add-node strategy.
    pub add_node_rate: f64,
    /// Relative weight of the perturb-weight strategy.
    pub perturb_weight_rate: f64,
    /// Relative weight of the toggle-enabled strategy.
    pub toggle_enabled_rate: f64,
    /// Perturbations are drawn from `[-power, power]`.
    pub weight_perturbation_power: f64,
    /// Added connections draw their weight from `[-range, range]`.
    pub new_connection_weight_range: f64,
    /// Credit in `[0, 1]` awarded by the similarity score to a gene missing
    /// from the other genome (a present gene earns 1).
    pub disjoint_credit: f64,
}

impl Default for NeatConfig {
    fn default() -> Self {
        Self {
            num_inputs: 2,
            num_outputs: 1,
            start_enabled: false,
            weight_init: WeightInit::default(),
            add_connection_rate: 0.01,
            add_node_rate: 0.01,
            perturb_weight_rate: 0.80,
            toggle_enabled_rate: 0.08,
            weight_perturbation_power: 0.5,
            new_connection_weight_range: 1.0,
            disjoint_credit: 0.5,
        }
    }
}

impl NeatConfig {
    /// Default configuration for the given shape.
    #[must_use]
    pub fn minimal(num_inputs: usize, num_outputs: usize) -> Self {
        Self {
            num_inputs,
            num_outputs,
            ..Default::default()
        }
    }

    /// Strategy weights in `[add_connection, add_node, perturb_weight, toggle_enabled]` order.
    #[must_use]
    pub fn strategy_rates(&self) -> [f64; 4] {
        [
            self.add_connection_rate,
            self.add_node_rate,
            self.perturb_weight_rate,
            self.toggle_enabled_rate,
        ]
    }

    /// Check that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rates = self.strategy_rates();
        if let Some(&rate) = rates.iter().find(|r| !r.is_finite() || **r < 0.0) {
            return Err(ConfigError::InvalidStrategyRate(rate));
        }
        if rates.iter().all(|&r| r == 0.0) {
            return Err(ConfigError::NoStrategyEnabled);
        }
        self.weight_init.validate()?;
        let power = self.weight_perturbation_power;
        if !power.is_finite() || power < 0.0 {
            return Err(ConfigError::InvalidPerturbationPower(power));
        }
        let range = self.new_connection_weight_range;
        if !range.is_finite() || range < 0.0 {
            return Err(ConfigError::InvalidWeightRange {
                min: -range,
                max: range,
            });
        }
        if !(0.0..=1.0).contains(&self.disjoint_credit) {
            return Err(ConfigError::InvalidDisjointCredit(self.disjoint_credit));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Strategy rate {0} must be finite and non-negative")]
    InvalidStrategyRate(f64),
    #[error("At least one mutation strategy must have a positive rate")]
    NoStrategyEnabled,
    #[error("Weight range [{min}, {max}] must be finite and ordered")]
    InvalidWeightRange { min: f64, max: f64 },
    #[error("Weight perturbation power {0} must be finite and non-negative")]
    InvalidPerturbationPower(f64),
    #[error("Disjoint credit {0} must lie in [0, 1]")]
    InvalidDisjointCredit(f64),
}
