//! Per-frame hand-off to the presentation layer.

use crate::config::Settings;
use crate::error::Result;
use crate::flappy::{Bird, Collision, Floor, Pipe, SpriteSet};

/// What the presentation layer reports back before each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Continue,
    /// Stop the current generation (and, in the CLI, the whole run).
    Quit,
}

/// Why a generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneReason {
    /// The score reached `max_score`.
    ScoreCap,
    /// Every bird failed (or there were none to begin with).
    NoSurvivors,
    /// Every pipe of the fixed pool has been passed.
    PipesExhausted,
    /// The presentation layer asked to quit.
    Quit,
}

impl DoneReason {
    pub fn description(self) -> &'static str {
        match self {
            DoneReason::ScoreCap => "score cap reached",
            DoneReason::NoSurvivors => "no birds left",
            DoneReason::PipesExhausted => "pipe pool exhausted",
            DoneReason::Quit => "quit requested",
        }
    }
}

/// Failures of one generation, by cause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureTally {
    pub top_pipe: u32,
    pub bottom_pipe: u32,
    pub floor: u32,
    pub ceiling: u32,
}

impl FailureTally {
    pub fn record(&mut self, collision: Collision) {
        match collision {
            Collision::TopPipe => self.top_pipe += 1,
            Collision::BottomPipe => self.bottom_pipe += 1,
            Collision::Floor => self.floor += 1,
            Collision::Ceiling => self.ceiling += 1,
        }
    }

    pub fn get(&self, collision: Collision) -> u32 {
        match collision {
            Collision::TopPipe => self.top_pipe,
            Collision::BottomPipe => self.bottom_pipe,
            Collision::Floor => self.floor,
            Collision::Ceiling => self.ceiling,
        }
    }

    pub fn total(&self) -> u32 {
        self.top_pipe + self.bottom_pipe + self.floor + self.ceiling
    }
}

/// Summary of a finished generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    pub generation: u32,
    pub reason: DoneReason,
    pub score: u32,
    pub frames: u64,
    /// Simulated seconds at the start of the last frame.
    pub elapsed: f64,
    pub survivors: usize,
    pub failures: FailureTally,
}

/// Read-only snapshot of the world after a frame.
pub struct FrameView<'a> {
    pub generation: u32,
    pub frame: u64,
    pub score: u32,
    pub elapsed: f64,
    pub birds: Vec<&'a Bird>,
    pub pipes: &'a [Pipe],
    pub floor: &'a Floor,
    pub sprites: &'a SpriteSet,
    pub settings: &'a Settings,
}

impl FrameView<'_> {
    pub fn alive(&self) -> usize {
        self.birds.len()
    }
}

/// Presentation layer driven by the frame loop.
pub trait Presenter {
    /// Wait until the next frame is due and report whether to quit.
    fn pace(&mut self, fps: u32) -> Result<Signal>;

    /// Show one finished frame.
    fn present(&mut self, view: &FrameView<'_>) -> Result<()>;
}

/// Runs frames back to back without drawing anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Presenter for Headless {
    fn pace(&mut self, _fps: u32) -> Result<Signal> {
        Ok(Signal::Continue)
    }

    fn present(&mut self, _view: &FrameView<'_>) -> Result<()> {
        Ok(())
    }
}
