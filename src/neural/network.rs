//! Feed-forward evaluation of a [`Genome`] and its Graphviz rendering.

use super::genome::Genome;
use crate::core::constants::{INPUT_NAMES, NUM_INPUTS, OUTPUT_NAME};
use crate::core::controller::Controller;

/// Steepened tanh: `tanh(2.5 z)`, with `2.5 z` clamped to [-60, 60].
pub fn tanh_activation(z: f64) -> f64 {
    (2.5 * z).clamp(-60.0, 60.0).tanh()
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    bias: f64,
    weights: Vec<f64>,
}

impl Node {
    fn evaluate(&self, inputs: &[f64]) -> f64 {
        let sum: f64 = self
            .weights
            .iter()
            .zip(inputs)
            .map(|(w, x)| w * x)
            .sum();
        tanh_activation(self.bias + sum)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedForwardNetwork {
    hidden: Vec<Node>,
    output: Node,
}

impl FeedForwardNetwork {
    pub fn create(genome: &Genome) -> Self {
        let mut chunks = genome.weights.chunks(NUM_INPUTS + 1);
        let mut hidden = Vec::with_capacity(genome.hidden);
        for _ in 0..genome.hidden {
            hidden.push(node_from(chunks.next().unwrap_or(&[])));
        }
        let output_start = genome.hidden * (NUM_INPUTS + 1);
        let output = node_from(genome.weights.get(output_start..).unwrap_or(&[]));
        Self { hidden, output }
    }

    /// Output values in (-1, 1). Missing inputs read as 0.
    pub fn activate(&self, inputs: &[f64]) -> Vec<f64> {
        let mut padded = [0.0; NUM_INPUTS];
        for (slot, value) in padded.iter_mut().zip(inputs) {
            *slot = *value;
        }

        if self.hidden.is_empty() {
            return vec![self.output.evaluate(&padded)];
        }
        let hidden: Vec<f64> = self.hidden.iter().map(|n| n.evaluate(&padded)).collect();
        vec![self.output.evaluate(&hidden)]
    }

    /// Graphviz digraph of the network. Positive weights are drawn green,
    /// negative ones red; pen width grows with the weight's magnitude.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph network {\n");
        dot.push_str("    node [fontsize=9, height=0.2, shape=circle, width=0.2];\n");
        for name in INPUT_NAMES {
            dot.push_str(&format!(
                "    \"{name}\" [shape=box, style=filled, fillcolor=lightgray];\n"
            ));
        }
        for i in 0..self.hidden.len() {
            dot.push_str(&format!("    \"h{i}\" [style=filled, fillcolor=white];\n"));
        }
        dot.push_str(&format!(
            "    \"{OUTPUT_NAME}\" [style=filled, fillcolor=lightblue];\n"
        ));

        if self.hidden.is_empty() {
            for (name, w) in INPUT_NAMES.iter().zip(&self.output.weights) {
                dot.push_str(&edge(name, OUTPUT_NAME, *w));
            }
        } else {
            for (i, node) in self.hidden.iter().enumerate() {
                let target = format!("h{i}");
                for (name, w) in INPUT_NAMES.iter().zip(&node.weights) {
                    dot.push_str(&edge(name, &target, *w));
                }
            }
            for (i, w) in self.output.weights.iter().enumerate() {
                dot.push_str(&edge(&format!("h{i}"), OUTPUT_NAME, *w));
            }
        }
        dot.push_str("}\n");
        dot
    }
}

impl Controller for FeedForwardNetwork {
    fn activate(&mut self, inputs: &[f64]) -> Vec<f64> {
        FeedForwardNetwork::activate(self, inputs)
    }
}

fn node_from(chunk: &[f64]) -> Node {
    match chunk.split_first() {
        Some((bias, weights)) => Node {
            bias: *bias,
            weights: weights.to_vec(),
        },
        None => Node {
            bias: 0.0,
            weights: Vec::new(),
        },
    }
}

/// One DOT edge line, coloured by the weight's sign.
fn edge(from: &str, to: &str, weight: f64) -> String {
    let color = if weight > 0.0 { "green" } else { "red" };
    let width = 0.1 + weight.abs() / 5.0;
    format!("    \"{from}\" -> \"{to}\" [color={color}, penwidth={width:.3}, style=solid];\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_activation_shape() {
        assert_eq!(tanh_activation(0.0), 0.0);
        assert!((tanh_activation(1.0) - 2.5f64.tanh()).abs() < 1e-12);
        assert!(tanh_activation(1e9) <= 1.0);
        assert!(tanh_activation(-1e9) >= -1.0);
    }

    #[test]
    fn test_direct_network_uses_layout() {
        // bias 0.1, only delta_y_bottom connected
        let genome = Genome::new(0, 0, vec![0.1, 0.0, 0.0, 0.2]);
        let network = genome.network();
        let out = network.activate(&[100.0, 50.0, 1.0]);
        assert!((out[0] - tanh_activation(0.1 + 0.2)).abs() < 1e-12);
    }

    #[test]
    fn test_hidden_network_uses_layout() {
        // h0 = act(1.0 * x0), h1 = act(-1.0 * x1); out = act(0.5 + h0 - h1)
        let weights = vec![
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, -1.0, 0.0, //
            0.5, 1.0, -1.0,
        ];
        let genome = Genome::new(0, 2, weights);
        let network = genome.network();
        let h0 = tanh_activation(0.2);
        let h1 = tanh_activation(-0.3);
        let out = network.activate(&[0.2, 0.3, 0.0]);
        assert!((out[0] - tanh_activation(0.5 + h0 - h1)).abs() < 1e-12);
    }

    #[test]
    fn test_outputs_stay_in_open_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for hidden in [0, 4] {
            let genome = Genome::random(0, hidden, 1.0, &mut rng);
            let network = genome.network();
            for inputs in [[0.0, 0.0, 0.0], [350.0, -200.0, 40.0], [-5.0, 3.0, 1e6]] {
                let out = network.activate(&inputs);
                assert_eq!(out.len(), 1);
                assert!(out[0] >= -1.0 && out[0] <= 1.0);
            }
        }
    }

    #[test]
    fn test_dot_lists_named_nodes_and_colored_edges() {
        let genome = Genome::new(0, 0, vec![0.0, 1.0, -2.0, 0.0]);
        let dot = genome.network().to_dot();
        assert!(dot.starts_with("digraph network {"));
        assert!(dot.contains("\"delta_x\" -> \"Jump or Not\" [color=green, penwidth=0.300"));
        assert!(dot.contains("\"delta_y_top\" -> \"Jump or Not\" [color=red, penwidth=0.500"));
        assert!(dot.contains("\"delta_y_bottom\""));
        assert!(dot.trim_end().ends_with('}'));
    }
}
