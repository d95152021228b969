//! Weight-only neuro-evolution driving the simulation.

pub mod config;
pub mod population;
pub mod report;
pub mod stats;

pub use config::TrainerConfig;
pub use population::{Flow, Population};
pub use report::write_report;
pub use stats::{GenerationStats, StatisticsReporter};
