//! Neural controllers: fixed-topology genomes and their networks.

pub mod genome;
pub mod network;

pub use genome::Genome;
pub use network::{tanh_activation, FeedForwardNetwork};
