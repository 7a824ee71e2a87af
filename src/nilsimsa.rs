//! Built-in Nilsimsa adapter.
//!
//! Classic 256-bit Nilsimsa digest: every trigram drawn from a five-byte
//! sliding window bumps one of 256 accumulators (selected through the fixed
//! 53-permutation table below), and a digest bit is set when its accumulator
//! ends above the mean. Similar texts share most trigram statistics, so their
//! digests land close in Hamming distance.
//!
//! The digest is deterministic, seed-free, and a pure function of the input
//! bytes. Texts shorter than three bytes produce the all-zero digest.

use crate::hasher::{FuzzyHash, FuzzyHasher, HasherError};

/// Digest width in bits.
pub const NILSIMSA_WIDTH: usize = 256;

/// Fixed byte permutation table used by the trigram transition function.
const TRAN: [u8; 256] = [
    0x02, 0xD6, 0x9E, 0x6F, 0xF9, 0x1D, 0x04, 0xAB, 0xD0, 0x22, 0x16, 0x1F, 0xD8, 0x73, 0xA1,
    0xAC, 0x3B, 0x70, 0x62, 0x96, 0x1E, 0x6E, 0x8F, 0x39, 0x9D, 0x05, 0x14, 0x4A, 0xA6, 0xBE,
    0xAE, 0x0E, 0xCF, 0xB9, 0x9C, 0x9A, 0xC7, 0x68, 0x13, 0xE1, 0x2D, 0xA4, 0xEB, 0x51, 0x8D,
    0x64, 0x6B, 0x50, 0x23, 0x80, 0x03, 0x41, 0xEC, 0xBB, 0x71, 0xCC, 0x7A, 0x86, 0x7F, 0x98,
    0xF2, 0x36, 0x5E, 0xEE, 0x8E, 0xCE, 0x4F, 0xB8, 0x32, 0xB6, 0x5F, 0x59, 0xDC, 0x1B, 0x31,
    0x4C, 0x7B, 0xF0, 0x63, 0x01, 0x6C, 0xBA, 0x07, 0xE8, 0x12, 0x77, 0x49, 0x3C, 0xDA, 0x46,
    0xFE, 0x2F, 0x79, 0x1C, 0x9B, 0x30, 0xE3, 0x00, 0x06, 0x7E, 0x2E, 0x0F, 0x38, 0x33, 0x21,
    0xAD, 0xA5, 0x54, 0xCA, 0xA7, 0x29, 0xFC, 0x5A, 0x47, 0x69, 0x7D, 0xC5, 0x95, 0xB5, 0xF4,
    0x0B, 0x90, 0xA3, 0x81, 0x6D, 0x25, 0x55, 0x35, 0xF5, 0x75, 0x74, 0x0A, 0x26, 0xBF, 0x19,
    0x5C, 0x1A, 0xC6, 0xFF, 0x99, 0x5D, 0x84, 0xAA, 0x66, 0x3E, 0xAF, 0x78, 0xB3, 0x20, 0x43,
    0xC1, 0xED, 0x24, 0xEA, 0xE6, 0x3F, 0x18, 0xF3, 0xA0, 0x42, 0x57, 0x08, 0x53, 0x60, 0xC3,
    0xC0, 0x83, 0x40, 0x82, 0xD7, 0x09, 0xBD, 0x44, 0x2A, 0x67, 0xA8, 0x93, 0xE0, 0xC2, 0x56,
    0x9F, 0xD9, 0xDD, 0x85, 0x15, 0xB4, 0x8A, 0x27, 0x28, 0x92, 0x76, 0xDE, 0xEF, 0xF8, 0xB2,
    0xB7, 0xC9, 0x3D, 0x45, 0x94, 0x4B, 0x11, 0x0D, 0x65, 0xD5, 0x34, 0x8B, 0x91, 0x0C, 0xFA,
    0x87, 0xE9, 0x7C, 0x5B, 0xB1, 0x4D, 0xE5, 0xD4, 0xCB, 0x10, 0xA2, 0x17, 0x89, 0xBC, 0xDB,
    0xB0, 0xE2, 0x97, 0x88, 0x52, 0xF7, 0x48, 0xD3, 0x61, 0x2C, 0x3A, 0x2B, 0xD1, 0x8C, 0xFB,
    0xF1, 0xCD, 0xE4, 0x6A, 0xE7, 0xA9, 0xFD, 0xC4, 0x37, 0xC8, 0xD2, 0xF6, 0xDF, 0x58, 0x72,
    0x4E,
];

/// Trigram transition: maps three window bytes and a combination index to an
/// accumulator slot.
#[inline]
fn tran3(a: u8, b: u8, c: u8, n: u8) -> usize {
    let mixed = (TRAN[a.wrapping_add(n) as usize] ^ TRAN[b as usize].wrapping_mul(n + n + 1))
        .wrapping_add(TRAN[(c ^ TRAN[n as usize]) as usize]);
    mixed as usize
}

/// Nilsimsa fuzzy hasher, `H = 256`.
///
/// Stateless; one instance can hash any number of texts, concurrently if the
/// caller wishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NilsimsaHasher;

impl NilsimsaHasher {
    pub fn new() -> Self {
        Self
    }

    /// Digest the raw bytes of `text` into 256 accumulator counts, then
    /// threshold each against the mean trigram count.
    fn digest(text: &str) -> FuzzyHash {
        let mut acc = [0u32; 256];
        let mut window = [None::<u8>; 4];
        let mut count = 0usize;

        for &ch in text.as_bytes() {
            count += 1;
            if let (Some(c1), Some(c2)) = (window[0], window[1]) {
                acc[tran3(ch, c1, c2, 0)] += 1;
                if let Some(c3) = window[2] {
                    acc[tran3(ch, c1, c3, 1)] += 1;
                    acc[tran3(ch, c2, c3, 2)] += 1;
                    if let Some(c4) = window[3] {
                        acc[tran3(ch, c1, c4, 3)] += 1;
                        acc[tran3(ch, c2, c4, 4)] += 1;
                        acc[tran3(ch, c3, c4, 5)] += 1;
                        acc[tran3(c4, c1, ch, 6)] += 1;
                        acc[tran3(c4, c3, ch, 7)] += 1;
                    }
                }
            }
            window = [Some(ch), window[0], window[1], window[2]];
        }

        // Total trigrams accumulated for the given byte count; the mean over
        // the 256 slots is the bit threshold.
        let total: u32 = match count {
            0..=2 => 0,
            3 => 1,
            4 => 8,
            n => 8 * n as u32 - 28,
        };
        let threshold = total / 256;

        let mut words = vec![0u64; 4];
        for (slot, &value) in acc.iter().enumerate() {
            if value > threshold {
                words[slot / 64] |= 1u64 << (slot % 64);
            }
        }
        FuzzyHash::from_words(words, NILSIMSA_WIDTH)
    }
}

impl FuzzyHasher for NilsimsaHasher {
    fn width(&self) -> usize {
        NILSIMSA_WIDTH
    }

    fn hash(&self, text: &str) -> Result<FuzzyHash, HasherError> {
        Ok(Self::digest(text))
    }
}
