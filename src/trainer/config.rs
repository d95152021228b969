//! Evolution parameters.

use crate::config::{non_negative, positive, probability, ConfigError};
use serde::{Deserialize, Serialize};

/// Configuration of the weight-evolving population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainerConfig {
    /// Genomes per generation
    pub population_size: usize,

    /// Hidden nodes per network (0 = inputs wired straight to the output)
    pub hidden_nodes: usize,

    /// Best genomes copied unchanged into the next generation
    pub elitism: usize,

    /// Fraction of the ranked population allowed to reproduce
    pub survival_threshold: f64,

    /// Initial weights are drawn from [-weight_init_range, weight_init_range]
    pub weight_init_range: f64,

    /// Chance that a child weight is perturbed
    pub weight_mutate_rate: f64,

    /// Standard deviation-like scale of a perturbation
    pub weight_mutate_power: f64,

    /// Chance that a child weight is replaced by a fresh random value
    pub weight_replace_rate: f64,

    pub weight_min: f64,
    pub weight_max: f64,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            hidden_nodes: 0,
            elitism: 2,
            survival_threshold: 0.2,
            weight_init_range: 1.0,
            weight_mutate_rate: 0.8,
            weight_mutate_power: 0.5,
            weight_replace_rate: 0.1,
            weight_min: -30.0,
            weight_max: 30.0,
            seed: None,
        }
    }
}

impl TrainerConfig {
    /// Small population for tests and smoke runs
    pub fn quick_test() -> Self {
        Self {
            population_size: 10,
            elitism: 1,
            seed: Some(42),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("population_size", self.population_size as f64)?;
        positive("weight_init_range", self.weight_init_range)?;
        probability("survival_threshold", self.survival_threshold)?;
        probability("weight_mutate_rate", self.weight_mutate_rate)?;
        probability("weight_replace_rate", self.weight_replace_rate)?;
        if self.survival_threshold == 0.0 {
            return Err(ConfigError::NotPositive {
                field: "survival_threshold",
                value: 0.0,
            });
        }
        non_negative("weight_mutate_power", self.weight_mutate_power)?;
        if self.weight_min >= self.weight_max {
            return Err(ConfigError::InvertedRange {
                low_field: "weight_min",
                low: self.weight_min,
                high_field: "weight_max",
                high: self.weight_max,
            });
        }
        if self.elitism > self.population_size {
            return Err(ConfigError::ElitismTooLarge {
                elitism: self.elitism,
                population: self.population_size,
            });
        }
        Ok(())
    }
}
