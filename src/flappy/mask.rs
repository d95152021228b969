//! Per-pixel hit masks.

/// Opaque-pixel map of a sprite, used for exact collision tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl HitMask {
    /// Build a mask by asking `opaque(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut opaque: impl FnMut(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(opaque(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// A fully opaque rectangle.
    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Build a mask from an alpha channel; pixels with alpha above
    /// `threshold` are opaque.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8], threshold: u8) -> Self {
        Self::from_fn(width, height, |x, y| {
            alpha
                .get((y * width + x) as usize)
                .is_some_and(|&a| a > threshold)
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at `(x, y)` is opaque; out-of-range pixels are not.
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.bits[(y as u64 * self.width as u64 + x as u64) as usize]
    }

    /// Number of opaque pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Mirror the mask top-to-bottom.
    pub fn flipped_vertically(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| {
            self.get(x as i64, (self.height - 1 - y) as i64)
        })
    }

    /// First overlapping pixel (in `self` coordinates, row-major) when
    /// `other`'s top-left corner sits at `offset` relative to `self`'s.
    pub fn overlap(&self, other: &HitMask, offset: (i64, i64)) -> Option<(u32, u32)> {
        let (dx, dy) = offset;
        let x_start = dx.max(0);
        let x_end = (dx + other.width as i64).min(self.width as i64);
        let y_start = dy.max(0);
        let y_end = (dy + other.height as i64).min(self.height as i64);

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x, y) && other.get(x - dx, y - dy) {
                    return Some((x as u32, y as u32));
                }
            }
        }
        None
    }

    pub fn overlaps(&self, other: &HitMask, offset: (i64, i64)) -> bool {
        self.overlap(other, offset).is_some()
    }
}
