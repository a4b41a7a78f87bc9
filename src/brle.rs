//! Background run-length coding for overlay rasters that are mostly one value.
//!
//! The stream is a sequence of pairs: a count of background bytes, then a count of literal
//! bytes followed by those literals. Both counts are a single byte, so longer runs are split
//! across pairs and either count may be zero.

use alloc::vec::Vec;

pub fn encode(pixels: &[u8], bg: u8) -> Vec<u8> {
    let mut encoded = Vec::new();
    let mut rest = pixels;
    while !rest.is_empty() {
        let run = rest
            .iter()
            .take(usize::from(u8::MAX))
            .take_while(|p| **p == bg)
            .count();
        encoded.push(run as u8);
        rest = &rest[run..];

        let literals = rest
            .iter()
            .take(usize::from(u8::MAX))
            .take_while(|p| **p != bg)
            .count();
        encoded.push(literals as u8);
        encoded.extend_from_slice(&rest[..literals]);
        rest = &rest[literals..];
    }
    encoded
}

/// Calls `sink` for every decoded byte. A pair cut short by the end of `encoded` ends decoding.
pub fn decode<F: FnMut(u8)>(encoded: &[u8], bg: u8, mut sink: F) {
    let mut rest = encoded;
    while let [run, count, tail @ ..] = rest {
        (0..*run).for_each(|_| sink(bg));
        let count = usize::from(*count);
        match tail.get(..count) {
            Some(literals) => literals.iter().for_each(|b| sink(*b)),
            None => {
                log::warn!("brle: truncated literal run");
                return;
            }
        }
        rest = &tail[count..];
    }
    if let [run] = rest {
        (0..*run).for_each(|_| sink(bg));
    }
}
