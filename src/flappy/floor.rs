//! Scrolling floor made of three repeating tiles.

#[derive(Debug, Clone, PartialEq)]
pub struct Floor {
    tiles: [f64; 3],
    pub y: f64,
    pub tile_width: f64,
}

impl Floor {
    pub fn new(y: f64, tile_width: f64) -> Self {
        Self {
            tiles: [0.0, tile_width, tile_width * 2.0],
            y,
            tile_width,
        }
    }

    /// Scroll left; a tile that has fully left the screen is placed right
    /// after the rightmost tile.
    pub fn advance(&mut self, velocity: f64) {
        for x in &mut self.tiles {
            *x -= velocity;
        }
        for i in 0..self.tiles.len() {
            if self.tiles[i] + self.tile_width < 0.0 {
                let rightmost = self
                    .tiles
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, &x)| x)
                    .fold(f64::MIN, f64::max);
                self.tiles[i] = rightmost + self.tile_width;
            }
        }
    }

    /// Left edges of the three tiles, in tile order.
    pub fn tiles(&self) -> [f64; 3] {
        self.tiles
    }
}
