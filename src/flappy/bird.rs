//! Bird physics and flap animation.

use super::mask::HitMask;
use super::sprites::{BirdFrame, SpriteSet};
use crate::config::Settings;

/// Below this tilt (degrees) the bird dives with its wings held still.
pub const DIVE_ANGLE: f64 = -45.0;

/// Flap cycle shown while the bird is not diving, one slot per
/// `bird_animation_time` frames.
const FLAP_CYCLE: [BirdFrame; 4] = [
    BirdFrame::MidFlap,
    BirdFrame::UpFlap,
    BirdFrame::DownFlap,
    BirdFrame::UpFlap,
];

/// One flying agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    /// Left edge; fixed for the whole generation.
    pub x: f64,
    /// Top edge; grows downwards.
    pub y: f64,
    /// Velocity set by the last jump (negative = upward).
    pub velocity: f64,
    /// Frames since the last jump.
    pub time: u32,
    /// Tilt in degrees, positive = nose up.
    pub tilt: f64,
    pub animation_time: u32,
    pub frame: BirdFrame,
}

impl Bird {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            time: 0,
            tilt: 0.0,
            animation_time: 0,
            frame: BirdFrame::MidFlap,
        }
    }

    /// Vertical displacement for the next frame: `v*t + a*t²/2` capped at
    /// the per-frame maximum.
    pub fn displacement(&self, settings: &Settings) -> f64 {
        let t = self.time as f64;
        let d = self.velocity * t + 0.5 * settings.bird_acceleration * t * t;
        d.min(settings.bird_max_displacement)
    }

    /// Advance one frame: move along the jump curve, ease the tilt towards
    /// the climb or dive limit and step the flap animation.
    pub fn advance(&mut self, settings: &Settings) {
        self.time += 1;
        let displacement = self.displacement(settings);
        self.y += displacement;

        let up = settings.bird_max_up_angle;
        let down = settings.bird_max_down_angle;
        let ease = settings.bird_angular_acceleration;
        let min_step = settings.bird_min_incremental_angle;

        if displacement < 0.0 {
            self.tilt = if self.tilt < up {
                (self.tilt + (ease * (up - self.tilt)).max(min_step)).min(up).max(down)
            } else {
                up
            };
        } else {
            self.tilt = if self.tilt > down {
                (self.tilt - (ease * (self.tilt - down)).max(min_step)).min(up).max(down)
            } else {
                down
            };
        }

        self.animate(settings);
    }

    /// Restart the jump curve with the jump impulse.
    pub fn jump(&mut self, settings: &Settings) {
        self.velocity = settings.bird_jump_velocity;
        self.time = 0;
    }

    /// Pick the sprite for this frame.
    pub fn animate(&mut self, settings: &Settings) {
        self.animation_time += 1;

        if self.tilt < DIVE_ANGLE {
            self.frame = BirdFrame::MidFlap;
            self.animation_time = 0;
            return;
        }

        let slot = (self.animation_time / settings.bird_animation_time.max(1)) as usize;
        match FLAP_CYCLE.get(slot) {
            Some(&frame) => self.frame = frame,
            None => {
                self.frame = BirdFrame::MidFlap;
                self.animation_time = 0;
            }
        }
    }

    pub fn mask<'a>(&self, sprites: &'a SpriteSet) -> &'a HitMask {
        sprites.bird(self.frame)
    }

    pub fn height(&self, sprites: &SpriteSet) -> f64 {
        self.mask(sprites).height() as f64
    }

    pub fn width(&self, sprites: &SpriteSet) -> f64 {
        self.mask(sprites).width() as f64
    }
}
