//! Generational weight evolution.
//!
//! Each generation is evaluated by a caller-supplied closure that writes a
//! fitness into every genome. The next generation keeps the `elitism` best
//! genomes unchanged and fills the remaining slots with mutated copies of
//! parents drawn from the top `survival_threshold` fraction.

use super::config::TrainerConfig;
use super::stats::StatisticsReporter;
use crate::core::frame::{DoneReason, GenerationOutcome};
use crate::error::Result;
use crate::neural::Genome;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Whether training goes on after a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

impl From<DoneReason> for Flow {
    fn from(reason: DoneReason) -> Self {
        match reason {
            DoneReason::Quit => Flow::Stop,
            _ => Flow::Continue,
        }
    }
}

pub struct Population<R: Rng = ChaCha8Rng> {
    config: TrainerConfig,
    genomes: Vec<Genome>,
    rng: R,
    generation: u32,
    next_id: u64,
    reporter: StatisticsReporter,
}

impl Population<ChaCha8Rng> {
    /// Population seeded from `config.seed` (entropy when unset).
    pub fn from_config(config: TrainerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::new(config, rng)
    }
}

impl<R: Rng> Population<R> {
    pub fn new(config: TrainerConfig, mut rng: R) -> Self {
        let genomes: Vec<Genome> = (0..config.population_size as u64)
            .map(|id| Genome::random(id, config.hidden_nodes, config.weight_init_range, &mut rng))
            .collect();
        let next_id = genomes.len() as u64;
        Self {
            config,
            genomes,
            rng,
            generation: 0,
            next_id,
            reporter: StatisticsReporter::new(),
        }
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn reporter(&self) -> &StatisticsReporter {
        &self.reporter
    }

    pub fn into_reporter(self) -> StatisticsReporter {
        self.reporter
    }

    /// Evaluate and reproduce for up to `max_generations` generations.
    ///
    /// Stops early when an evaluation ends in a quit. Returns the best genome
    /// seen over the whole run.
    pub fn run<F>(&mut self, mut evaluate: F, max_generations: u32) -> Result<Option<Genome>>
    where
        F: FnMut(&mut [Genome], u32) -> Result<GenerationOutcome>,
    {
        for remaining in (0..max_generations).rev() {
            let outcome = evaluate(&mut self.genomes, self.generation)?;
            self.reporter.record(&self.genomes, &outcome);

            if Flow::from(outcome.reason) == Flow::Stop {
                log::info!("Training stopped after generation {}", self.generation);
                break;
            }
            if remaining > 0 {
                self.reproduce();
                self.generation += 1;
            }
        }
        Ok(self.reporter.best_genome().cloned())
    }

    /// Replace the current genomes with the next generation.
    pub fn reproduce(&mut self) {
        let size = self.config.population_size;
        let mut ranked: Vec<&Genome> = self.genomes.iter().collect();
        ranked.sort_by(|a, b| {
            let fa = a.fitness.unwrap_or(f64::NEG_INFINITY);
            let fb = b.fitness.unwrap_or(f64::NEG_INFINITY);
            fb.total_cmp(&fa)
        });

        let survivors = ((ranked.len() as f64 * self.config.survival_threshold).ceil() as usize)
            .clamp(1, ranked.len().max(1));

        let mut next = Vec::with_capacity(size);
        for elite in ranked.iter().take(self.config.elitism.min(size)) {
            let mut copy = (*elite).clone();
            copy.fitness = None;
            next.push(copy);
        }

        let parents: Vec<Genome> = ranked.into_iter().take(survivors).cloned().collect();
        while next.len() < size {
            let child = match parents.len() {
                0 => Genome::random(
                    self.next_id,
                    self.config.hidden_nodes,
                    self.config.weight_init_range,
                    &mut self.rng,
                ),
                n => {
                    let parent = &parents[self.rng.gen_range(0..n)];
                    self.mutated(parent)
                }
            };
            self.next_id += 1;
            next.push(child);
        }
        self.genomes = next;
    }

    fn mutated(&mut self, parent: &Genome) -> Genome {
        let config = &self.config;
        let weights = parent
            .weights
            .iter()
            .map(|&w| {
                let roll: f64 = self.rng.gen();
                let w = if roll < config.weight_replace_rate {
                    self.rng
                        .gen_range(-config.weight_init_range..=config.weight_init_range)
                } else if roll < config.weight_replace_rate + config.weight_mutate_rate {
                    w + self
                        .rng
                        .gen_range(-config.weight_mutate_power..=config.weight_mutate_power)
                } else {
                    w
                };
                w.clamp(config.weight_min, config.weight_max)
            })
            .collect();
        Genome::new(self.next_id, parent.hidden, weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frame::FailureTally;

    fn outcome(generation: u32, reason: DoneReason) -> GenerationOutcome {
        GenerationOutcome {
            generation,
            reason,
            score: 0,
            frames: 1,
            elapsed: 0.0,
            survivors: 0,
            failures: FailureTally::default(),
        }
    }

    fn population() -> Population {
        Population::new(TrainerConfig::quick_test(), ChaCha8Rng::seed_from_u64(5))
    }

    #[test]
    fn test_initial_population() {
        let pop = population();
        assert_eq!(pop.genomes().len(), 10);
        let ids: Vec<u64> = pop.genomes().iter().map(|g| g.id).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_reproduce_keeps_size_and_elite() {
        let mut pop = population();
        for (i, genome) in pop.genomes.iter_mut().enumerate() {
            genome.fitness = Some(i as f64);
        }
        let best = pop.genomes[9].clone();
        pop.reproduce();

        assert_eq!(pop.genomes().len(), 10);
        assert_eq!(pop.genomes()[0].weights, best.weights);
        assert_eq!(pop.genomes()[0].id, best.id);
        assert!(pop.genomes().iter().all(|g| g.fitness.is_none()));
        // Children get fresh ids
        assert!(pop.genomes()[1..].iter().all(|g| g.id >= 10));
    }

    #[test]
    fn test_mutation_respects_weight_bounds() {
        let config = TrainerConfig {
            weight_mutate_power: 100.0,
            weight_min: -2.0,
            weight_max: 2.0,
            ..TrainerConfig::quick_test()
        };
        let mut pop = Population::new(config, ChaCha8Rng::seed_from_u64(9));
        for _ in 0..5 {
            for genome in pop.genomes.iter_mut() {
                genome.fitness = Some(1.0);
            }
            pop.reproduce();
        }
        assert!(pop
            .genomes()
            .iter()
            .flat_map(|g| g.weights.iter())
            .all(|w| (-2.0..=2.0).contains(w)));
    }

    #[test]
    fn test_run_stops_on_quit() {
        let mut pop = population();
        let mut calls = 0;
        let best = pop
            .run(
                |genomes, generation| {
                    calls += 1;
                    for (i, g) in genomes.iter_mut().enumerate() {
                        g.fitness = Some(i as f64);
                    }
                    let reason = if generation == 2 {
                        DoneReason::Quit
                    } else {
                        DoneReason::NoSurvivors
                    };
                    Ok(outcome(generation, reason))
                },
                10,
            )
            .unwrap();
        assert_eq!(calls, 3);
        assert_eq!(pop.reporter().generations().len(), 3);
        assert_eq!(best.and_then(|g| g.fitness), Some(9.0));
    }

    #[test]
    fn test_run_honours_max_generations() {
        let mut pop = population();
        let mut seen = Vec::new();
        pop.run(
            |genomes, generation| {
                seen.push(generation);
                for g in genomes.iter_mut() {
                    g.fitness = Some(generation as f64);
                }
                Ok(outcome(generation, DoneReason::NoSurvivors))
            },
            4,
        )
        .unwrap();
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert_eq!(pop.generation(), 3);
    }

    #[test]
    fn test_flow_from_reason() {
        assert_eq!(Flow::from(DoneReason::Quit), Flow::Stop);
        assert_eq!(Flow::from(DoneReason::ScoreCap), Flow::Continue);
        assert_eq!(Flow::from(DoneReason::PipesExhausted), Flow::Continue);
    }
}
