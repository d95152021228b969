//! Flappy Bird game world.
//!
//! Birds fall along a parabolic jump curve, pipes scroll in from the right
//! with a random gap, and the floor tiles loop underneath. Collisions are
//! tested per pixel against the bird's current sprite.

pub mod bird;
pub mod collision;
pub mod floor;
pub mod mask;
pub mod pipe;
pub mod sprites;

pub use bird::Bird;
pub use collision::{check_collision, collision, Collision};
pub use floor::Floor;
pub use mask::HitMask;
pub use pipe::{passed_count, target_pipe_index, Pipe};
pub use sprites::{BirdFrame, PipeSprite, SpriteSet};
