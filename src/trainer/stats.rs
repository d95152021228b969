//! Per-generation fitness statistics.

use crate::core::frame::GenerationOutcome;
use crate::neural::Genome;
use serde::Serialize;

/// Fitness summary of one evaluated generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationStats {
    pub generation: u32,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub stdev_fitness: f64,
    pub best_genome_id: u64,
    pub score: u32,
    pub frames: u64,
    pub reason: &'static str,
}

/// Collects [`GenerationStats`] and tracks the best genome seen so far.
#[derive(Debug, Clone, Default)]
pub struct StatisticsReporter {
    generations: Vec<GenerationStats>,
    best: Option<Genome>,
}

impl StatisticsReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an evaluated generation. Genomes without a fitness are skipped.
    pub fn record(&mut self, genomes: &[Genome], outcome: &GenerationOutcome) -> Option<&GenerationStats> {
        let fitnesses: Vec<f64> = genomes.iter().filter_map(|g| g.fitness).collect();
        let champion = genomes
            .iter()
            .filter(|g| g.fitness.is_some())
            .max_by(|a, b| fitness_of(a).total_cmp(&fitness_of(b)))?;

        let improved = self
            .best
            .as_ref()
            .map_or(true, |best| fitness_of(champion) > fitness_of(best));
        if improved {
            self.best = Some(champion.clone());
        }

        let stats = GenerationStats {
            generation: outcome.generation,
            best_fitness: fitness_of(champion),
            mean_fitness: mean(&fitnesses),
            stdev_fitness: stdev(&fitnesses),
            best_genome_id: champion.id,
            score: outcome.score,
            frames: outcome.frames,
            reason: outcome.reason.description(),
        };
        log::info!(
            "Population's average fitness: {:.5} stdev: {:.5}",
            stats.mean_fitness,
            stats.stdev_fitness
        );
        log::info!(
            "Best fitness: {:.5} - genome {} (score {}, {} frames)",
            stats.best_fitness,
            stats.best_genome_id,
            stats.score,
            stats.frames
        );
        self.generations.push(stats);
        self.generations.last()
    }

    pub fn generations(&self) -> &[GenerationStats] {
        &self.generations
    }

    pub fn best_genome(&self) -> Option<&Genome> {
        self.best.as_ref()
    }

    pub fn fitness_mean(&self) -> Vec<f64> {
        self.generations.iter().map(|s| s.mean_fitness).collect()
    }

    pub fn fitness_stdev(&self) -> Vec<f64> {
        self.generations.iter().map(|s| s.stdev_fitness).collect()
    }

    pub fn best_fitness(&self) -> Vec<f64> {
        self.generations.iter().map(|s| s.best_fitness).collect()
    }
}

fn fitness_of(genome: &Genome) -> f64 {
    genome.fitness.unwrap_or(f64::NEG_INFINITY)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn stdev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
