//! Greedy reduction of a color census to at most six families.
//!
//! The clustering here is deliberately simple and order-dependent: each
//! pass scans colors by descending weight and joins a color to the first
//! family whose founder is within the current distance threshold. It does
//! not search the color space for better centers. A target with colors
//! these passes cannot merge should be recolored by hand instead.

use tracing::debug;

use crate::color::{ColorCensus, ColorMix, Rgb};
use crate::error::{Error, Result};

pub const MIN_FAMILIES: usize = 3;
pub const MAX_FAMILIES: usize = 6;

const INITIAL_DISTANCE: u32 = 250;
const DISTANCE_STEP: u32 = 20;
const DISTANCE_LIMIT: u32 = 1000;

/// One cluster of nearby colors: its weighted-centroid representative and
/// the pixel weight it accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorFamily {
    pub color: Rgb,
    pub weight: u64,
}

/// Reduce a census to between three and six color families.
///
/// With six or fewer distinct colors every color is its own family, kept
/// in first-appearance order. Otherwise the census goes through the
/// iterative merge passes and the low-weight sieve.
pub fn quantize(census: &ColorCensus) -> Result<Vec<ColorFamily>> {
    if census.distinct() <= MAX_FAMILIES {
        let families = census
            .seen_order()
            .iter()
            .map(|&(color, weight)| ColorFamily { color, weight })
            .collect();
        return bounded(families);
    }
    bounded(reduce(census))
}

/// Take the `limit` most common colors as the families, ignoring the rest.
pub fn limit_colors(census: &ColorCensus, limit: usize) -> Result<Vec<ColorFamily>> {
    let families = census
        .ranked()
        .into_iter()
        .take(limit)
        .map(|(color, weight)| ColorFamily { color, weight })
        .collect();
    bounded(families)
}

fn bounded(families: Vec<ColorFamily>) -> Result<Vec<ColorFamily>> {
    if families.len() > MAX_FAMILIES {
        return Err(Error::QuantizationFailure {
            families: families.len(),
        });
    }
    if families.len() < MIN_FAMILIES {
        return Err(Error::DegenerateImage {
            families: families.len(),
        });
    }
    Ok(families)
}

/// Iterate merge passes, widening the distance threshold whenever a pass
/// makes no progress, until few enough families remain or the threshold
/// runs out. The sieve then drops families too small to matter.
fn reduce(census: &ColorCensus) -> Vec<ColorFamily> {
    let numpix = census.total();
    let mut families: Vec<(Rgb, u64)> = census.seen_order().to_vec();
    let mut count = families.len();
    let mut previous = count + 1;
    let mut distance = INITIAL_DISTANCE;
    while count > MAX_FAMILIES && distance < DISTANCE_LIMIT {
        if count == previous {
            distance += DISTANCE_STEP;
        }
        previous = count;
        families = merge_pass(families, distance);
        count = families.len();
        debug!("merge pass at distance {distance}: {count} families");
    }
    sieve(families, numpix)
}

/// A single merge pass: rank by descending weight, then first-fit each
/// color against the founders seen so far in this pass.
fn merge_pass(mut colors: Vec<(Rgb, u64)>, distance: u32) -> Vec<(Rgb, u64)> {
    struct Family {
        founder: Rgb,
        mix: ColorMix,
    }

    colors.sort_by(|a, b| b.1.cmp(&a.1));
    let mut families: Vec<Family> = Vec::new();
    'colors: for (color, weight) in colors {
        for family in &mut families {
            if color.distance_sq(family.founder) < distance {
                family.mix.add(color, weight);
                continue 'colors;
            }
        }
        let mut mix = ColorMix::new();
        mix.add(color, weight);
        families.push(Family {
            founder: color,
            mix,
        });
    }
    families
        .into_iter()
        .map(|f| (f.mix.average(), f.mix.weight()))
        .collect()
}

/// Drop families covering less than 1% of the image (at minimum, two
/// pixels); they would waste one of the six pattern slots.
fn sieve(families: Vec<(Rgb, u64)>, numpix: u64) -> Vec<ColorFamily> {
    let threshold = (0.01 * numpix as f64).round_ties_even().max(2.0) as u64;
    families
        .into_iter()
        .filter(|&(_, weight)| weight > threshold)
        .map(|(color, weight)| ColorFamily { color, weight })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn census_of(colors: &[(Rgb, u64)]) -> ColorCensus {
        let mut census = ColorCensus::new();
        for &(color, count) in colors {
            for _ in 0..count {
                census.tally(color);
            }
        }
        census
    }

    #[test]
    fn test_few_colors_stay_in_seen_order() {
        let red = Rgb::new(200, 0, 0);
        let green = Rgb::new(0, 200, 0);
        let blue = Rgb::new(0, 0, 200);
        // blue outweighs the others but appeared last.
        let census = census_of(&[(red, 2), (green, 3), (blue, 10)]);
        let families = quantize(&census).unwrap();
        assert_eq!(
            families,
            vec![
                ColorFamily { color: red, weight: 2 },
                ColorFamily { color: green, weight: 3 },
                ColorFamily { color: blue, weight: 10 },
            ]
        );
    }

    #[test]
    fn test_too_few_colors_is_degenerate() {
        let census = census_of(&[(Rgb::new(0, 0, 0), 5), (Rgb::new(255, 255, 255), 5)]);
        let err = quantize(&census).unwrap_err();
        assert!(matches!(err, Error::DegenerateImage { families: 2 }));
    }

    #[test]
    fn test_reduction_escalates_distance_until_families_merge() {
        // Eight reds 17 apart: nothing merges below 17² = 289, so the
        // threshold must climb 250 → 270 → 290 before pairs form.
        let colors: Vec<(Rgb, u64)> = (0..8)
            .map(|i| (Rgb::new(17 * i as u8, 0, 0), 80 - 10 * i as u64))
            .collect();
        let census = census_of(&colors);
        let families = quantize(&census).unwrap();
        assert_eq!(
            families,
            vec![
                ColorFamily { color: Rgb::new(8, 0, 0), weight: 150 },
                ColorFamily { color: Rgb::new(42, 0, 0), weight: 110 },
                ColorFamily { color: Rgb::new(75, 0, 0), weight: 70 },
                ColorFamily { color: Rgb::new(108, 0, 0), weight: 30 },
            ]
        );
    }

    #[test]
    fn test_unmergeable_colors_fail() {
        // Seven colors 32 apart: 32² = 1024 stays out of reach even at the
        // final threshold, and all are too heavy for the sieve.
        let colors: Vec<(Rgb, u64)> = (0..7).map(|i| (Rgb::new(32 * i as u8, 0, 0), 10)).collect();
        let census = census_of(&colors);
        let err = quantize(&census).unwrap_err();
        assert!(matches!(err, Error::QuantizationFailure { families: 7 }));
    }

    #[test]
    fn test_sieve_rescues_an_overcount() {
        // Six heavy colors plus one two-pixel speck, all mutually far
        // apart. Merging never succeeds, but the sieve drops the speck.
        let heavy = [
            Rgb::new(0, 0, 0),
            Rgb::new(0, 64, 0),
            Rgb::new(0, 128, 0),
            Rgb::new(64, 0, 0),
            Rgb::new(128, 0, 0),
            Rgb::new(0, 0, 64),
        ];
        let mut colors: Vec<(Rgb, u64)> = heavy.iter().map(|&c| (c, 100)).collect();
        colors.push((Rgb::new(0, 0, 128), 2));
        let census = census_of(&colors);
        let families = quantize(&census).unwrap();
        assert_eq!(families.len(), 6);
        assert!(families.iter().all(|f| f.weight == 100));
    }

    #[test]
    fn test_never_returns_more_than_six() {
        for spread in [3u8, 9, 17, 33] {
            let colors: Vec<(Rgb, u64)> = (0..7)
                .map(|i| (Rgb::new(spread * i as u8, 0, 0), 50))
                .collect();
            match quantize(&census_of(&colors)) {
                Ok(families) => {
                    assert!((MIN_FAMILIES..=MAX_FAMILIES).contains(&families.len()))
                }
                Err(Error::QuantizationFailure { families }) => assert!(families > MAX_FAMILIES),
                Err(Error::DegenerateImage { families }) => assert!(families < MIN_FAMILIES),
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_limit_colors_takes_most_common() {
        let colors: Vec<(Rgb, u64)> = (0..8)
            .map(|i| (Rgb::new(30 * i as u8, 0, 0), 10 + i as u64))
            .collect();
        let census = census_of(&colors);
        let families = limit_colors(&census, 4).unwrap();
        assert_eq!(families.len(), 4);
        // Heaviest first.
        assert_eq!(families[0].color, Rgb::new(210, 0, 0));
        assert_eq!(families[0].weight, 17);
        assert_eq!(families[3].weight, 14);
    }

    #[test]
    fn test_limit_colors_below_minimum_is_degenerate() {
        let colors: Vec<(Rgb, u64)> = (0..8).map(|i| (Rgb::new(30 * i as u8, 0, 0), 5)).collect();
        let err = limit_colors(&census_of(&colors), 2).unwrap_err();
        assert!(matches!(err, Error::DegenerateImage { families: 2 }));
    }
}
