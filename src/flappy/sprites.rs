//! Sprite geometry and hit masks.
//!
//! The game ships no image assets; sprites are drawn procedurally at the
//! classic Flappy Bird sizes so that collision masks have a real silhouette
//! (round body, beak, a wing that moves between flap frames).

use super::mask::HitMask;

pub const BIRD_WIDTH: u32 = 34;
pub const BIRD_HEIGHT: u32 = 24;
pub const PIPE_WIDTH: u32 = 52;
pub const PIPE_HEIGHT: u32 = 320;
/// Height of the wider lip at the open end of a pipe.
pub const PIPE_LIP_HEIGHT: u32 = 24;
/// How far the pipe body is inset from the lip on each side.
pub const PIPE_BODY_INSET: u32 = 2;
pub const FLOOR_WIDTH: u32 = 336;
pub const FLOOR_HEIGHT: u32 = 112;

/// The three flap sprites of the bird.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BirdFrame {
    #[default]
    MidFlap,
    UpFlap,
    DownFlap,
}

impl BirdFrame {
    pub const ALL: [BirdFrame; 3] = [BirdFrame::MidFlap, BirdFrame::UpFlap, BirdFrame::DownFlap];

    fn index(self) -> usize {
        match self {
            BirdFrame::MidFlap => 0,
            BirdFrame::UpFlap => 1,
            BirdFrame::DownFlap => 2,
        }
    }
}

/// Pipe sprite: the bottom pipe and its vertically flipped top twin.
#[derive(Debug, Clone)]
pub struct PipeSprite {
    pub width: u32,
    pub height: u32,
    pub bottom: HitMask,
    pub top: HitMask,
}

impl PipeSprite {
    pub fn new(bottom: HitMask) -> Self {
        let top = bottom.flipped_vertically();
        Self {
            width: bottom.width(),
            height: bottom.height(),
            bottom,
            top,
        }
    }
}

/// All sprites the simulation needs for collision and layout.
#[derive(Debug, Clone)]
pub struct SpriteSet {
    birds: [HitMask; 3],
    pub pipe: PipeSprite,
    pub floor_width: u32,
    pub floor_height: u32,
}

impl Default for SpriteSet {
    fn default() -> Self {
        Self {
            birds: BirdFrame::ALL.map(bird_mask),
            pipe: PipeSprite::new(pipe_mask(PIPE_WIDTH, PIPE_HEIGHT)),
            floor_width: FLOOR_WIDTH,
            floor_height: FLOOR_HEIGHT,
        }
    }
}

impl SpriteSet {
    /// Replace the bird frames and the pipe with custom masks.
    pub fn with_masks(birds: [HitMask; 3], pipe_bottom: HitMask, floor_width: u32) -> Self {
        Self {
            birds,
            pipe: PipeSprite::new(pipe_bottom),
            floor_width,
            floor_height: FLOOR_HEIGHT,
        }
    }

    pub fn bird(&self, frame: BirdFrame) -> &HitMask {
        &self.birds[frame.index()]
    }
}

fn bird_mask(frame: BirdFrame) -> HitMask {
    let (cx, cy, rx, ry) = (16.0, 12.0, 15.0, 10.0);
    HitMask::from_fn(BIRD_WIDTH, BIRD_HEIGHT, |x, y| {
        let (fx, fy) = (x as f64 + 0.5, y as f64 + 0.5);
        let body = ((fx - cx) / rx).powi(2) + ((fy - cy) / ry).powi(2) <= 1.0;
        let beak = (28..34).contains(&x) && (11..15).contains(&y);
        let wing = match frame {
            BirdFrame::MidFlap => (3..13).contains(&x) && (11..15).contains(&y),
            BirdFrame::UpFlap => (6..12).contains(&x) && y < 4,
            BirdFrame::DownFlap => (6..12).contains(&x) && y >= 20,
        };
        body || beak || wing
    })
}

fn pipe_mask(width: u32, height: u32) -> HitMask {
    HitMask::from_fn(width, height, |x, y| {
        y < PIPE_LIP_HEIGHT || (PIPE_BODY_INSET..width - PIPE_BODY_INSET).contains(&x)
    })
}
