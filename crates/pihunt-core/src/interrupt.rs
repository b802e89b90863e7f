use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag for the search loop.
///
/// The loop polls this once per nibble and finishes its in-progress
/// score/checkpoint step before exiting, so a tripped gate never leaves a
/// half-written checkpoint. The flag is the only state shared with signal
/// handlers; `SeqCst` guarantees the loop observes a trip within one
/// iteration.
#[derive(Debug, Default)]
pub struct InterruptGate {
    tripped: AtomicBool,
}

impl InterruptGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the gate. Returns whether it was already tripped, letting a
    /// handler escalate on a repeated signal.
    pub fn trip(&self) -> bool {
        self.tripped.swap(true, Ordering::SeqCst)
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }
}
