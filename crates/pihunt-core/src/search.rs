//! The streaming scan: windows, scoring, best tracking and termination.

use tracing::debug;

use crate::color::Rgb;
use crate::error::Result;
use crate::interrupt::InterruptGate;
use crate::pattern::Pattern;
use crate::quantize::ColorFamily;
use crate::raster::IndexedImage;
use crate::score::{JointHistogram, Score};
use crate::source::{self, DigitSource};
use crate::window::WindowPair;

/// Nibbles between progress callbacks.
pub const PROGRESS_INTERVAL: u64 = 5000;

/// Receives every rewrite of the best-so-far image.
pub trait CheckpointSink {
    fn write(&mut self, checkpoint: &IndexedImage) -> Result<()>;
}

/// Observes scan lifecycle events. Implementations drive console output;
/// the engine itself never prints.
pub trait SearchObserver {
    /// A window strictly improved on the best score. Called before the
    /// checkpoint write.
    fn improved(&mut self, position: u64, best: &BestResult);
    /// Called every [`PROGRESS_INTERVAL`] nibbles.
    fn progress(&mut self, position: u64);
}

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A window with zero mismatches turned up.
    ExactMatch,
    /// A finite source ran out of digits.
    StreamExhausted,
    /// The interrupt gate was tripped.
    Interrupted,
}

/// The best window seen so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestResult {
    /// Fractional hex digits preceding the window. -1 is legal: the
    /// earliest odd-parity window begins at the integral digit.
    pub offset: i64,
    pub score: Score,
    /// Window bytes, oldest first.
    pub window: Vec<u8>,
    /// 256-entry palette fitted to the window.
    pub palette: Vec<Rgb>,
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub termination: Termination,
    /// Nibbles fully processed before the scan ended.
    pub nibbles: u64,
    pub best: Option<BestResult>,
}

/// Keeps the best score seen; only strictly smaller scores replace it.
#[derive(Debug)]
pub struct BestTracker {
    threshold: Score,
    best: Option<BestResult>,
}

impl BestTracker {
    /// Starts at the unreachable worst score, so the first full window
    /// always records.
    pub fn new(numpix: usize) -> Self {
        Self {
            threshold: Score::worst(numpix),
            best: None,
        }
    }

    pub fn improves(&self, score: Score) -> bool {
        score < self.threshold
    }

    pub fn record(&mut self, best: BestResult) {
        debug_assert!(self.improves(best.score));
        self.threshold = best.score;
        self.best = Some(best);
    }

    pub fn best(&self) -> Option<&BestResult> {
        self.best.as_ref()
    }

    pub fn into_best(self) -> Option<BestResult> {
        self.best
    }
}

/// Drives the window pair, scoring and best tracking over a digit source.
pub struct Searcher<'a> {
    pattern: &'a Pattern,
    families: &'a [ColorFamily],
}

impl<'a> Searcher<'a> {
    pub fn new(pattern: &'a Pattern, families: &'a [ColorFamily]) -> Self {
        Self { pattern, families }
    }

    /// Scan until an exact match, stream exhaustion, or a tripped gate.
    ///
    /// The gate is polled once per nibble, after any score/checkpoint
    /// work for that nibble has finished, so a graceful interrupt never
    /// abandons a half-written checkpoint.
    pub fn run(
        &self,
        source: &mut dyn DigitSource,
        sink: &mut dyn CheckpointSink,
        observer: &mut dyn SearchObserver,
        gate: &InterruptGate,
    ) -> Result<SearchOutcome> {
        let numpix = self.pattern.len();
        let (width, height) = self.pattern.dimensions();
        let mut windows = WindowPair::new(numpix);
        let mut histogram = JointHistogram::new(self.families.len());
        let mut tracker = BestTracker::new(numpix);
        let mut position: u64 = 0;

        let termination = 'scan: loop {
            let Some(batch) = source.next_batch()? else {
                break 'scan Termination::StreamExhausted;
            };
            for &digit in &batch {
                let nibble = source::nibble_value(digit, position + 1)?;
                if windows.feed(nibble) {
                    histogram.rebuild(windows.active(), self.pattern);
                    let score = histogram.score();
                    if tracker.improves(score) {
                        let best = BestResult {
                            offset: position as i64 - 2 * numpix as i64 + 1,
                            score,
                            window: windows.snapshot(),
                            palette: histogram.fit_palette(self.families),
                        };
                        observer.improved(position, &best);
                        let checkpoint = IndexedImage::new(
                            width,
                            height,
                            best.palette.clone(),
                            best.window.clone(),
                        );
                        sink.write(&checkpoint)?;
                        debug!("best {} at offset {}", best.score, best.offset);
                        let exact = best.score.is_exact();
                        tracker.record(best);
                        if exact {
                            position += 1;
                            break 'scan Termination::ExactMatch;
                        }
                    }
                }
                if position % PROGRESS_INTERVAL == 0 {
                    observer.progress(position);
                }
                position += 1;
                if gate.is_tripped() {
                    break 'scan Termination::Interrupted;
                }
            }
        };

        Ok(SearchOutcome {
            termination,
            nibbles: position,
            best: tracker.into_best(),
        })
    }
}
