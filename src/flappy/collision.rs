//! Collision checks between a bird, its target pipe and the play-area bounds.

use super::bird::Bird;
use super::floor::Floor;
use super::pipe::Pipe;
use super::sprites::SpriteSet;

/// What a bird ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collision {
    TopPipe,
    BottomPipe,
    Floor,
    /// Flew above the visible area.
    Ceiling,
}

impl Collision {
    pub const ALL: [Collision; 4] = [
        Collision::TopPipe,
        Collision::BottomPipe,
        Collision::Floor,
        Collision::Ceiling,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collision::TopPipe => "top pipe",
            Collision::BottomPipe => "bottom pipe",
            Collision::Floor => "floor",
            Collision::Ceiling => "ceiling",
        }
    }
}

/// First collision of `bird` against `pipe`, the floor and the ceiling.
///
/// Pipe hits use exact per-pixel overlap of the bird's current sprite mask
/// with the pipe masks, so a bird that only touches a pipe's bounding box
/// does not fail.
pub fn collision(bird: &Bird, pipe: &Pipe, floor: &Floor, sprites: &SpriteSet) -> Option<Collision> {
    let bird_mask = bird.mask(sprites);
    let dx = (pipe.x - bird.x).round() as i64;
    let top_offset = (dx, (pipe.top_top_left - bird.y).round() as i64);
    let bottom_offset = (dx, (pipe.bottom_top_left - bird.y).round() as i64);

    if bird_mask.overlaps(&sprites.pipe.top, top_offset) {
        Some(Collision::TopPipe)
    } else if bird_mask.overlaps(&sprites.pipe.bottom, bottom_offset) {
        Some(Collision::BottomPipe)
    } else if bird.y + bird.height(sprites) > floor.y {
        Some(Collision::Floor)
    } else if bird.y < 0.0 {
        Some(Collision::Ceiling)
    } else {
        None
    }
}

/// Whether the bird failed this frame.
pub fn check_collision(bird: &Bird, pipe: &Pipe, floor: &Floor, sprites: &SpriteSet) -> bool {
    collision(bird, pipe, floor, sprites).is_some()
}
