//! Fixed-topology genome: a flat weight vector and its fitness.

use super::network::FeedForwardNetwork;
use crate::core::constants::{NUM_INPUTS, NUM_OUTPUTS};
use crate::core::controller::{Controller, Entrant};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub id: u64,
    /// Width of the single hidden layer; 0 wires inputs straight to the output.
    pub hidden: usize,
    /// Biases and connection weights, grouped per receiving node.
    ///
    /// Without a hidden layer: `[bias, w0, w1, w2]`. Otherwise each hidden
    /// node contributes `[bias, w0, w1, w2]`, followed by the output node's
    /// `[bias, h0, .., h(n-1)]`.
    pub weights: Vec<f64>,
    pub fitness: Option<f64>,
}

impl Genome {
    /// Number of weights a genome with `hidden` hidden nodes carries.
    pub fn weight_count(hidden: usize) -> usize {
        if hidden == 0 {
            NUM_OUTPUTS * (NUM_INPUTS + 1)
        } else {
            hidden * (NUM_INPUTS + 1) + NUM_OUTPUTS * (hidden + 1)
        }
    }

    pub fn new(id: u64, hidden: usize, weights: Vec<f64>) -> Self {
        debug_assert_eq!(weights.len(), Self::weight_count(hidden));
        Self {
            id,
            hidden,
            weights,
            fitness: None,
        }
    }

    /// Genome with every weight drawn uniformly from `[-range, range]`.
    pub fn random<R: Rng>(id: u64, hidden: usize, range: f64, rng: &mut R) -> Self {
        let weights = (0..Self::weight_count(hidden))
            .map(|_| rng.gen_range(-range..=range))
            .collect();
        Self::new(id, hidden, weights)
    }

    pub fn network(&self) -> FeedForwardNetwork {
        FeedForwardNetwork::create(self)
    }
}

impl Entrant for Genome {
    fn controller(&self) -> Box<dyn Controller> {
        Box::new(self.network())
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    fn fitness(&self) -> Option<f64> {
        self.fitness
    }
}
