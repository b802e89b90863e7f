//! Window scoring: the byte×family joint histogram and the two-part
//! mismatch score derived from it.

use std::fmt;

use crate::color::{ColorMix, Rgb};
use crate::pattern::Pattern;
use crate::quantize::ColorFamily;

/// Lexicographically ordered (mismatches, muddled); lower is better.
///
/// Zero mismatches means some byte→family assignment reproduces the
/// pattern exactly. The muddle count only breaks ties between windows
/// with equal mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score {
    pub mismatches: u32,
    pub muddled: u32,
}

impl Score {
    /// The sentinel no real window can reach: a full window always scores
    /// at most `numpix - 1` mismatches.
    pub fn worst(numpix: usize) -> Self {
        Self {
            mismatches: numpix as u32,
            muddled: numpix as u32,
        }
    }

    pub fn is_exact(self) -> bool {
        self.mismatches == 0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.mismatches, self.muddled)
    }
}

/// 256×families count table: how often each byte value coincides with
/// each pattern family across the window.
///
/// Rebuilt from scratch for every scored window — a one-byte shift
/// realigns the whole window against the pattern, so there is no cheap
/// incremental form. The allocation is reused across rebuilds.
#[derive(Debug)]
pub struct JointHistogram {
    families: usize,
    counts: Vec<u32>,
}

impl JointHistogram {
    pub fn new(families: usize) -> Self {
        debug_assert!(families > 0);
        Self {
            families,
            counts: vec![0; 256 * families],
        }
    }

    /// Recount the table for a full window, aligned oldest-to-newest
    /// against pattern positions 0..numpix-1.
    pub fn rebuild(&mut self, window: impl Iterator<Item = u8>, pattern: &Pattern) {
        self.counts.fill(0);
        for (byte, &family) in window.zip(pattern.indices()) {
            self.counts[byte as usize * self.families + family as usize] += 1;
        }
    }

    pub fn row(&self, byte: u8) -> &[u32] {
        let start = byte as usize * self.families;
        &self.counts[start..start + self.families]
    }

    /// Score the current table.
    ///
    /// Mismatches: for each byte value, every position not covered by its
    /// most frequent family is misrendered. Muddled: positions whose byte
    /// value co-occurs with every family, so no assignment makes it
    /// unambiguous.
    pub fn score(&self) -> Score {
        let mut mismatches = 0;
        let mut muddled = 0;
        for row in self.counts.chunks_exact(self.families) {
            let total: u32 = row.iter().sum();
            if total == 0 {
                continue;
            }
            let dominant = row.iter().copied().max().unwrap_or(0);
            mismatches += total - dominant;
            if row.iter().all(|&c| c > 0) {
                muddled += total;
            }
        }
        Score {
            mismatches,
            muddled,
        }
    }

    /// The 256-entry palette for a checkpoint: each byte value maps to the
    /// weighted average of the family colors it was counted against;
    /// bytes never seen map to black.
    pub fn fit_palette(&self, families: &[ColorFamily]) -> Vec<Rgb> {
        debug_assert_eq!(families.len(), self.families);
        self.counts
            .chunks_exact(self.families)
            .map(|row| {
                let mut mix = ColorMix::new();
                for (family, &count) in families.iter().zip(row) {
                    mix.add(family.color, count as u64);
                }
                mix.average()
            })
            .collect()
    }
}
