//! The nibble dribbler: two byte windows one nibble out of phase.

use std::collections::VecDeque;

/// The digit before the first fractional digit. The earliest odd-parity
/// byte straddles the decimal point, e.g. `0x32` for π's "3.2…".
const INTEGRAL_NIBBLE: u8 = 0x3;

/// A pair of fixed-capacity byte FIFOs fed one hex nibble at a time.
///
/// Each incoming nibble completes a byte with the nibble before it, and
/// consecutive bytes built this way land in alternating windows — the two
/// possible pairings of a digit stream into bytes. Only the window that
/// just received a byte is eligible for scoring.
#[derive(Debug)]
pub struct WindowPair {
    numpix: usize,
    active: VecDeque<u8>,
    idle: VecDeque<u8>,
    prev_nibble: u8,
}

impl WindowPair {
    pub fn new(numpix: usize) -> Self {
        debug_assert!(numpix > 0);
        Self {
            numpix,
            active: VecDeque::with_capacity(numpix),
            idle: VecDeque::with_capacity(numpix),
            prev_nibble: INTEGRAL_NIBBLE,
        }
    }

    /// Feed one nibble value (0–15). Returns true when the window that
    /// received the resulting byte is full and may be scored.
    pub fn feed(&mut self, nibble: u8) -> bool {
        debug_assert!(nibble <= 0xf);
        std::mem::swap(&mut self.active, &mut self.idle);
        let byte = self.prev_nibble << 4 | nibble;
        self.prev_nibble = nibble;
        if self.active.len() == self.numpix {
            self.active.pop_front();
        }
        self.active.push_back(byte);
        self.active.len() == self.numpix
    }

    /// Bytes of the just-updated window, oldest first.
    pub fn active(&self) -> impl Iterator<Item = u8> + '_ {
        self.active.iter().copied()
    }

    /// Owned copy of the just-updated window, oldest first.
    pub fn snapshot(&self) -> Vec<u8> {
        self.active.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_digits(pair: &mut WindowPair, digits: &str) -> Vec<bool> {
        digits
            .bytes()
            .map(|d| {
                let nibble = if d.is_ascii_digit() {
                    d - b'0'
                } else {
                    d - b'a' + 10
                };
                pair.feed(nibble)
            })
            .collect()
    }

    #[test]
    fn test_first_byte_straddles_the_decimal_point() {
        let mut pair = WindowPair::new(2);
        pair.feed(0x2);
        assert_eq!(pair.snapshot(), vec![0x32]);
    }

    #[test]
    fn test_bytes_alternate_between_windows() {
        let mut pair = WindowPair::new(2);
        let full = feed_digits(&mut pair, "243f");
        assert_eq!(full, vec![false, false, true, true]);
        // After 'f' the active window holds the even-aligned bytes.
        assert_eq!(pair.snapshot(), vec![0x24, 0x3f]);
    }

    #[test]
    fn test_full_window_evicts_oldest() {
        let mut pair = WindowPair::new(2);
        let full = feed_digits(&mut pair, "243f6");
        assert_eq!(full, vec![false, false, true, true, true]);
        // Odd-aligned window was [0x32, 0x43]; 0xf6 evicted 0x32.
        assert_eq!(pair.snapshot(), vec![0x43, 0xf6]);
    }

    #[test]
    fn test_window_fills_after_numpix_bytes_of_its_parity() {
        let numpix = 4;
        let mut pair = WindowPair::new(numpix);
        let full = feed_digits(&mut pair, "243f6a8885");
        let first_full = full.iter().position(|&f| f).unwrap();
        // Odd-parity bytes land at steps 0, 2, 4, …; the fourth lands at
        // step 2·numpix − 2.
        assert_eq!(first_full, 2 * numpix - 2);
        assert_eq!(pair.snapshot().len(), numpix);
        // Oldest first: 0x32, 0x43, 0xf6, 0xa8 after step 6 — one more
        // even step later the even window fills with 0x24, 0x3f, 0x6a, 0x88.
        let mut pair = WindowPair::new(numpix);
        feed_digits(&mut pair, "243f6a88");
        assert_eq!(pair.snapshot(), vec![0x24, 0x3f, 0x6a, 0x88]);
    }
}
