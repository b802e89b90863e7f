//! RGB color primitives: distance metric, weighted averaging, and the
//! pixel census the quantizer works from.

use std::collections::HashMap;
use std::fmt;

/// A color in 8-bit RGB space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared Euclidean distance between two colors.
    pub fn distance_sq(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

impl fmt::Display for Rgb {
    /// Hex code form, e.g. `#4A90D9`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Index of the candidate nearest to `color`.
///
/// Distance ties resolve to the earliest candidate, so results are
/// deterministic for a fixed candidate order.
pub fn nearest(color: Rgb, candidates: &[Rgb]) -> usize {
    debug_assert!(!candidates.is_empty());
    let mut best = 0;
    let mut best_dist = u32::MAX;
    for (i, &candidate) in candidates.iter().enumerate() {
        let dist = color.distance_sq(candidate);
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Weighted RGB accumulator.
///
/// Averages round half-to-even per channel, so a palette derived from an
/// even split between two colors is reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorMix {
    r: u64,
    g: u64,
    b: u64,
    weight: u64,
}

impl ColorMix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, color: Rgb, weight: u64) {
        self.r += color.r as u64 * weight;
        self.g += color.g as u64 * weight;
        self.b += color.b as u64 * weight;
        self.weight += weight;
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Weighted average of everything mixed in, or black if nothing was.
    pub fn average(&self) -> Rgb {
        if self.weight == 0 {
            return Rgb::BLACK;
        }
        Rgb {
            r: round_channel(self.r, self.weight),
            g: round_channel(self.g, self.weight),
            b: round_channel(self.b, self.weight),
        }
    }
}

fn round_channel(sum: u64, weight: u64) -> u8 {
    (sum as f64 / weight as f64).round_ties_even() as u8
}

/// Census of pixel colors, remembering first-appearance order.
#[derive(Debug, Default)]
pub struct ColorCensus {
    entries: Vec<(Rgb, u64)>,
    index: HashMap<Rgb, usize>,
}

impl ColorCensus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tally(&mut self, color: Rgb) {
        match self.index.get(&color) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(color, self.entries.len());
                self.entries.push((color, 1));
            }
        }
    }

    /// Number of distinct colors seen.
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// Total pixels tallied.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|&(_, n)| n).sum()
    }

    /// Colors in first-appearance order.
    pub fn seen_order(&self) -> &[(Rgb, u64)] {
        &self.entries
    }

    /// Colors by descending count; equal counts keep first-appearance order.
    pub fn ranked(&self) -> Vec<(Rgb, u64)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}
