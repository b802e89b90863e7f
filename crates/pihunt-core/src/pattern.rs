//! The fixed family-index sequence a candidate window is scored against.

use crate::color::{self, Rgb};
use crate::quantize::ColorFamily;

/// Row-major sequence of family indices, one per target pixel. Built once
/// per run and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    indices: Vec<u8>,
    width: u32,
    height: u32,
}

impl Pattern {
    /// Assign every pixel to its nearest family. Distance ties resolve to
    /// the earlier family, so the pattern is deterministic for a fixed
    /// family order.
    pub fn build(pixels: &[Rgb], width: u32, height: u32, families: &[ColorFamily]) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        let palette: Vec<Rgb> = families.iter().map(|f| f.color).collect();
        let indices = pixels
            .iter()
            .map(|&pixel| color::nearest(pixel, &palette) as u8)
            .collect();
        Self {
            indices,
            width,
            height,
        }
    }

    /// Number of pixels, which is also the window length in bytes.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Rows of the pattern grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.indices.chunks(self.width.max(1) as usize)
    }

    /// How many pixels each family ended up claiming.
    pub fn family_usage(&self, families: usize) -> Vec<u64> {
        let mut usage = vec![0u64; families];
        for &index in &self.indices {
            usage[index as usize] += 1;
        }
        usage
    }
}
