//! Console status lines, ordinals and the final citation.

use std::io::{self, Write};

use pihunt_core::{BestResult, SearchObserver, hex_string};

/// Column headers for the scan status line.
pub const HEADLINE: &str = "\
Digits checked  Best match at  Pixel mismatches  Bytes in match
--------------  -------------  ----------------  --------------";

/// Thousands-separated decimal rendering.
pub fn group_digits(n: i64) -> String {
    let raw = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(raw.len() + raw.len() / 3 + 1);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if n < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

/// Ordinal rendering (1st, 2nd, 3rd, 4th, ...) with thousands separators.
///
/// Suffixes follow the Euclidean remainder, so negative positions from a
/// window straddling the decimal point still format.
pub fn ordinal(n: i64) -> String {
    const SUFFIXES: [&str; 5] = ["th", "st", "nd", "rd", "th"];
    let grouped = group_digits(n);
    if n.rem_euclid(100) / 10 == 1 {
        return format!("{grouped}th");
    }
    let last = n.rem_euclid(10) as usize;
    format!("{grouped}{}", SUFFIXES[last.min(4)])
}

/// The inclusive digit and bit ranges a best window spans.
pub fn citation(offset: i64, numpix: usize) -> String {
    let n = numpix as i64;
    format!(
        "It contains the {} through {} hexadecimal digits of π.\n\
         Equivalently, the {} through {} bits.",
        ordinal(offset + 1),
        ordinal(offset + 2 * n),
        ordinal(4 * offset + 1),
        ordinal(4 * offset + 8 * n),
    )
}

/// Renders scan progress over a single overwritten console line.
#[derive(Default)]
pub struct ConsoleObserver;

impl SearchObserver for ConsoleObserver {
    fn improved(&mut self, position: u64, best: &BestResult) {
        let preview = hex_string(&best.window[..best.window.len().min(12)]);
        print!(
            "\r{:>14}  {:>13}  {:<16}  {preview}…",
            group_digits(position as i64),
            group_digits(best.offset),
            best.score.to_string(),
        );
        let _ = io::stdout().flush();
    }

    fn progress(&mut self, position: u64) {
        print!("\r{:>14}", group_digits(position as i64));
        let _ = io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1000), "1,000");
        assert_eq!(group_digits(1234567), "1,234,567");
        assert_eq!(group_digits(-1234), "-1,234");
    }

    #[test]
    fn test_ordinal_suffixes() {
        assert_eq!(ordinal(0), "0th");
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(101), "101st");
        assert_eq!(ordinal(111), "111th");
        assert_eq!(ordinal(1001), "1,001st");
    }

    #[test]
    fn test_ordinal_negative_positions() {
        assert_eq!(ordinal(-1), "-1th");
        assert_eq!(ordinal(-3), "-3th");
    }

    #[test]
    fn test_citation_ranges() {
        let text = citation(5, 4);
        assert!(text.contains("6th through 13th hexadecimal digits"));
        assert!(text.contains("21st through 52nd bits"));
    }

    #[test]
    fn test_citation_straddling_window() {
        let text = citation(-1, 4);
        assert!(text.contains("0th through 7th hexadecimal digits"));
        assert!(text.contains("-3th through 28th bits"));
    }
}
