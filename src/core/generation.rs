//! The per-generation frame loop.
//!
//! A [`Generation`] owns the world (floor, pipe pool, one bird per entrant)
//! for exactly one run. Each frame it scrolls the world, asks every living
//! bird's controller whether to jump, checks collisions against the target
//! pipe and writes the running fitness into the entrant. Birds that fail are
//! removed after the frame in a single compaction pass, so bird, controller
//! and fitness slot always leave together and in order.
//!
//! A [`Session`] carries settings, sprites, the pipe RNG and the generation
//! counter from one generation to the next.

use super::controller::{Controller, Entrant};
use super::frame::{
    DoneReason, FailureTally, FrameView, GenerationOutcome, Presenter, Signal,
};
use crate::config::Settings;
use crate::error::Result;
use crate::flappy::{collision, passed_count, target_pipe_index, Bird, Collision, Floor, Pipe, SpriteSet};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Running,
    Done(DoneReason),
}

/// One bird with its controller and the index of its entrant.
struct Agent {
    slot: usize,
    bird: Bird,
    controller: Box<dyn Controller>,
    failure: Option<Collision>,
}

pub struct Generation<'a, E: Entrant, R: Rng> {
    number: u32,
    settings: &'a Settings,
    sprites: &'a SpriteSet,
    entrants: &'a mut [E],
    rng: &'a mut R,
    floor: Floor,
    pipes: Vec<Pipe>,
    agents: Vec<Agent>,
    score: u32,
    /// Pipes recycled so far; they were all passed before being moved.
    recycled: u32,
    frame: u64,
    elapsed: f64,
    failures: FailureTally,
    state: GenerationState,
}

impl<'a, E: Entrant, R: Rng> Generation<'a, E, R> {
    /// Lay out the world and give every entrant a bird at the start position.
    /// Entrant fitness is reset to zero.
    pub fn new(
        number: u32,
        settings: &'a Settings,
        sprites: &'a SpriteSet,
        entrants: &'a mut [E],
        rng: &'a mut R,
    ) -> Self {
        let floor = Floor::new(settings.floor_y, sprites.floor_width as f64);

        let mut pipes = Vec::with_capacity(settings.pipe_count);
        for i in 0..settings.pipe_count {
            let x = settings.pipe_start_x + i as f64 * settings.pipe_horizontal_gap;
            pipes.push(Pipe::new(x, &sprites.pipe, settings, rng));
        }

        let mut agents = Vec::with_capacity(entrants.len());
        for (slot, entrant) in entrants.iter_mut().enumerate() {
            entrant.set_fitness(0.0);
            agents.push(Agent {
                slot,
                bird: Bird::new(settings.bird_start_x, settings.bird_start_y),
                controller: entrant.controller(),
                failure: None,
            });
        }

        let state = if agents.is_empty() {
            GenerationState::Done(DoneReason::NoSurvivors)
        } else {
            GenerationState::Running
        };

        Self {
            number,
            settings,
            sprites,
            entrants,
            rng,
            floor,
            pipes,
            agents,
            score: 0,
            recycled: 0,
            frame: 0,
            elapsed: 0.0,
            failures: FailureTally::default(),
            state,
        }
    }

    /// Run frames until the generation is done, pacing and drawing through
    /// `presenter`.
    pub fn run<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Result<GenerationOutcome> {
        loop {
            if let GenerationState::Done(reason) = self.state {
                return Ok(self.outcome(reason));
            }
            if presenter.pace(self.settings.fps)? == Signal::Quit {
                self.state = GenerationState::Done(DoneReason::Quit);
                continue;
            }
            self.step();
            presenter.present(&self.view())?;
        }
    }

    /// Simulate one frame.
    pub fn step(&mut self) -> GenerationState {
        if self.state != GenerationState::Running {
            return self.state;
        }
        let settings = self.settings;

        self.elapsed = round_centis(self.frame as f64 * settings.frame_seconds());
        self.frame += 1;

        self.floor.advance(settings.floor_velocity);

        let lead_x = self.agents[0].bird.x;
        for pipe in &mut self.pipes {
            pipe.advance(settings.pipe_velocity);
        }
        if settings.pipe_recycle {
            self.recycle_pipes();
        }
        self.score = self.recycled + passed_count(&self.pipes, lead_x);

        let Some(target) = target_pipe_index(&self.pipes, lead_x) else {
            log::warn!(
                "Generation {}: all {} pipes passed after {} frames",
                self.number,
                self.pipes.len(),
                self.frame
            );
            self.state = GenerationState::Done(DoneReason::PipesExhausted);
            return self.state;
        };
        let pipe = &self.pipes[target];
        let reward = self.elapsed + self.score as f64;

        for agent in &mut self.agents {
            agent.bird.advance(settings);

            let inputs = [
                agent.bird.x - pipe.x,
                agent.bird.y - pipe.top_height,
                agent.bird.y - pipe.bottom_top_left,
            ];
            let output = agent.controller.activate(&inputs);
            if output.first().is_some_and(|&o| o > settings.jump_threshold) {
                agent.bird.jump(settings);
            }

            agent.failure = collision(&agent.bird, pipe, &self.floor, self.sprites);
            let fitness = match agent.failure {
                Some(hit) => {
                    self.failures.record(hit);
                    log::debug!(
                        "Generation {}: bird {} hit the {} at frame {}",
                        self.number,
                        agent.slot,
                        hit.name(),
                        self.frame
                    );
                    reward - settings.failed_penalty
                }
                None => reward,
            };
            self.entrants[agent.slot].set_fitness(fitness);
        }

        self.agents.retain(|agent| agent.failure.is_none());

        if self.score >= settings.max_score {
            self.state = GenerationState::Done(DoneReason::ScoreCap);
        } else if self.agents.is_empty() {
            self.state = GenerationState::Done(DoneReason::NoSurvivors);
        }
        self.state
    }

    /// Move pipes that left the screen to the front of the queue.
    fn recycle_pipes(&mut self) {
        for i in 0..self.pipes.len() {
            if self.pipes[i].right_edge() >= 0.0 {
                continue;
            }
            let front = self
                .pipes
                .iter()
                .map(|pipe| pipe.x)
                .fold(f64::MIN, f64::max);
            let x = front + self.settings.pipe_horizontal_gap;
            self.pipes[i].respawn(x, self.settings, self.rng);
            self.recycled += 1;
        }
    }

    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            generation: self.number,
            frame: self.frame,
            score: self.score,
            elapsed: self.elapsed,
            birds: self.agents.iter().map(|agent| &agent.bird).collect(),
            pipes: &self.pipes,
            floor: &self.floor,
            sprites: self.sprites,
            settings: self.settings,
        }
    }

    fn outcome(&self, reason: DoneReason) -> GenerationOutcome {
        GenerationOutcome {
            generation: self.number,
            reason,
            score: self.score,
            frames: self.frame,
            elapsed: self.elapsed,
            survivors: self.agents.len(),
            failures: self.failures,
        }
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn alive(&self) -> usize {
        self.agents.len()
    }

    pub fn birds(&self) -> impl Iterator<Item = &Bird> {
        self.agents.iter().map(|agent| &agent.bird)
    }

    /// Entrant indices of the birds still flying, in order.
    pub fn alive_slots(&self) -> Vec<usize> {
        self.agents.iter().map(|agent| agent.slot).collect()
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    pub fn failures(&self) -> FailureTally {
        self.failures
    }
}

/// Settings, sprites, RNG and generation counter threaded through a run.
pub struct Session<R: Rng = ChaCha8Rng> {
    settings: Settings,
    sprites: SpriteSet,
    rng: R,
    generation: u32,
}

impl Session<ChaCha8Rng> {
    /// Session with default sprites; `seed` makes pipe layouts reproducible.
    pub fn new(settings: Settings, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(settings, SpriteSet::default(), rng)
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(settings: Settings, sprites: SpriteSet, rng: R) -> Self {
        Self {
            settings,
            sprites,
            rng,
            generation: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sprites(&self) -> &SpriteSet {
        &self.sprites
    }

    /// Number of the next generation to run (starting at 0).
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Run one generation for `entrants`, writing their fitness.
    pub fn run_generation<E, P>(
        &mut self,
        entrants: &mut [E],
        presenter: &mut P,
    ) -> Result<GenerationOutcome>
    where
        E: Entrant,
        P: Presenter + ?Sized,
    {
        let number = self.generation;
        self.generation += 1;

        log::info!(
            "****** Running generation {} with {} birds ******",
            number,
            entrants.len()
        );
        let mut generation = Generation::new(
            number,
            &self.settings,
            &self.sprites,
            entrants,
            &mut self.rng,
        );
        let outcome = generation.run(presenter)?;

        log::info!(
            "Generation {} done ({}): score {}, {} frames, {:.2}s, failures: {} pipe / {} floor / {} ceiling",
            outcome.generation,
            outcome.reason.description(),
            outcome.score,
            outcome.frames,
            outcome.elapsed,
            outcome.failures.top_pipe + outcome.failures.bottom_pipe,
            outcome.failures.floor,
            outcome.failures.ceiling
        );
        Ok(outcome)
    }
}

fn round_centis(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
