//! Pipe obstacles.

use super::sprites::PipeSprite;
use crate::config::Settings;
use rand::Rng;

/// A top + bottom pipe pair sharing one x position.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Left edge of both pipes.
    pub x: f64,
    pub width: f64,
    /// Sprite height of each pipe.
    pub height: f64,
    /// Where the top pipe ends (top of the gap).
    pub top_height: f64,
    /// Top-left y of the top pipe sprite (usually negative).
    pub top_top_left: f64,
    /// Top-left y of the bottom pipe sprite (bottom of the gap).
    pub bottom_top_left: f64,
}

impl Pipe {
    /// Create a pipe at `x` with a random gap drawn from the configured band.
    pub fn new<R: Rng>(x: f64, sprite: &PipeSprite, settings: &Settings, rng: &mut R) -> Self {
        let top_height =
            rng.gen_range(settings.pipe_top_min_height..settings.pipe_top_max_height) as f64;
        Self::with_gap(
            x,
            sprite.width as f64,
            sprite.height as f64,
            top_height,
            settings.pipe_vertical_gap,
        )
    }

    /// Create a pipe with an explicit gap position.
    pub fn with_gap(x: f64, width: f64, height: f64, top_height: f64, vertical_gap: f64) -> Self {
        Self {
            x,
            width,
            height,
            top_height,
            top_top_left: top_height - height,
            bottom_top_left: top_height + vertical_gap,
        }
    }

    /// Scroll left; pipes are never clamped and keep going off-screen.
    pub fn advance(&mut self, velocity: f64) {
        self.x -= velocity;
    }

    pub fn right_edge(&self) -> f64 {
        self.x + self.width
    }

    /// Whether the pipe's right edge is left of `x`.
    pub fn is_passed(&self, x: f64) -> bool {
        self.right_edge() < x
    }

    /// Give the pipe a new x and a fresh gap.
    pub fn respawn<R: Rng>(&mut self, x: f64, settings: &Settings, rng: &mut R) {
        let top_height =
            rng.gen_range(settings.pipe_top_min_height..settings.pipe_top_max_height) as f64;
        *self = Self::with_gap(x, self.width, self.height, top_height, settings.pipe_vertical_gap);
    }
}

/// The nearest pipe whose right edge has not yet passed `lead_x`.
///
/// Ties go to the first pipe in order. `None` only when every pipe has been
/// passed.
pub fn target_pipe_index(pipes: &[Pipe], lead_x: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, pipe) in pipes.iter().enumerate() {
        let distance = pipe.right_edge() - lead_x;
        if distance < 0.0 {
            continue;
        }
        match best {
            Some((_, closest)) if distance >= closest => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index)
}

/// Number of pipes whose right edge is left of `lead_x`.
pub fn passed_count(pipes: &[Pipe], lead_x: f64) -> u32 {
    pipes.iter().filter(|pipe| pipe.is_passed(lead_x)).count() as u32
}
