//! Triangular score matrix: pairwise construction and rebasing.
//!
//! The pairwise scores are conceptually an n×n symmetric matrix but only the
//! strict lower triangle is ever computed or stored, halving both the memory
//! and the number of difference calls. Entries live in one flat buffer with
//! the index mapping `(i, j) -> i(i-1)/2 + j` for `i > j`; the full square is
//! never materialized.

use rayon::prelude::*;

use crate::hasher::FuzzyHash;

/// Strictly lower-triangular matrix of pairwise scores.
///
/// An entry `(i, j)` with `i > j` holds `H - bitwise_difference(hash[i],
/// hash[j])`: higher means more similar. Entries are only ever read with
/// `i > j`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriMatrix {
    n: usize,
    cells: Vec<u32>,
}

impl TriMatrix {
    /// Flat-buffer offset of entry `(i, j)`, valid for `i > j`.
    #[inline]
    fn offset(i: usize, j: usize) -> usize {
        i * (i - 1) / 2 + j
    }

    /// Number of items the matrix covers (not the number of stored cells).
    pub fn items(&self) -> usize {
        self.n
    }

    /// Number of stored pair entries: `n(n-1)/2`.
    pub fn pair_count(&self) -> usize {
        self.cells.len()
    }

    /// True when the batch has no pairs (`n <= 1`).
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Score of the pair `(i, j)`.
    ///
    /// # Panics
    ///
    /// Unless `j < i < n`: only the strict lower triangle exists, and a
    /// wrapped offset would silently alias another pair's cell.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> u32 {
        assert!(j < i && i < self.n, "triangular read requires j < i < n");
        self.cells[Self::offset(i, j)]
    }

    /// Minimum score across all stored entries; `0` for the empty matrix.
    pub fn min_score(&self) -> u32 {
        self.cells.iter().copied().min().unwrap_or(0)
    }

    /// Rebase every entry so the batch minimum becomes zero.
    ///
    /// Returns the global minimum that was subtracted. A no-op returning `0`
    /// for the empty matrix.
    pub fn rebase(&mut self) -> u32 {
        let global_min = self.min_score();
        if global_min > 0 {
            for cell in &mut self.cells {
                *cell -= global_min;
            }
        }
        global_min
    }
}

/// Build the raw lower-triangular score matrix from a hash sequence.
///
/// For every pair `0 <= j < i < n` the score is `width - difference`, in
/// `[0, width]`. Pure function of the hashes; with `parallel` the rows are
/// computed across the rayon pool and the output is identical to the
/// sequential path. `n <= 1` yields an empty matrix.
pub fn build_scores(hashes: &[FuzzyHash], width: usize, parallel: bool) -> TriMatrix {
    let n = hashes.len();
    if n <= 1 {
        return TriMatrix { n, cells: Vec::new() };
    }

    let score = |i: usize, j: usize| -> u32 {
        width as u32 - hashes[i].bitwise_difference(&hashes[j])
    };

    let mut cells = Vec::with_capacity(n * (n - 1) / 2);
    if parallel {
        // Row i is an independent slice of the flat buffer; computing rows
        // in parallel and appending in order reproduces the sequential
        // layout exactly.
        let rows: Vec<Vec<u32>> = (1..n)
            .into_par_iter()
            .map(|i| (0..i).map(|j| score(i, j)).collect())
            .collect();
        for row in rows {
            cells.extend(row);
        }
    } else {
        for i in 1..n {
            for j in 0..i {
                cells.push(score(i, j));
            }
        }
    }

    TriMatrix { n, cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::FuzzyHash;

    fn hash_of(word: u64) -> FuzzyHash {
        FuzzyHash::from_words(vec![word], 64)
    }

    #[test]
    fn offset_mapping_is_row_major_triangular() {
        assert_eq!(TriMatrix::offset(1, 0), 0);
        assert_eq!(TriMatrix::offset(2, 0), 1);
        assert_eq!(TriMatrix::offset(2, 1), 2);
        assert_eq!(TriMatrix::offset(3, 0), 3);
        assert_eq!(TriMatrix::offset(4, 3), 9);
    }

    #[test]
    fn empty_for_zero_or_one_item() {
        let m = build_scores(&[], 64, false);
        assert!(m.is_empty());
        assert_eq!(m.items(), 0);

        let m = build_scores(&[hash_of(0)], 64, false);
        assert!(m.is_empty());
        assert_eq!(m.items(), 1);
        assert_eq!(m.min_score(), 0);
    }

    #[test]
    fn scores_are_width_minus_difference() {
        // distances: (1,0)=1 bit, (2,0)=2 bits, (2,1)=3 bits
        let hashes = vec![hash_of(0b000), hash_of(0b001), hash_of(0b110)];
        let m = build_scores(&hashes, 64, false);
        assert_eq!(m.pair_count(), 3);
        assert_eq!(m.get(1, 0), 63);
        assert_eq!(m.get(2, 0), 62);
        assert_eq!(m.get(2, 1), 61);
    }

    #[test]
    #[should_panic(expected = "triangular read requires j < i < n")]
    fn diagonal_read_panics() {
        let hashes = vec![hash_of(0), hash_of(1)];
        let m = build_scores(&hashes, 64, false);
        let _ = m.get(0, 0);
    }

    #[test]
    #[should_panic(expected = "triangular read requires j < i < n")]
    fn upper_triangle_read_panics() {
        let hashes = vec![hash_of(0), hash_of(1)];
        let m = build_scores(&hashes, 64, false);
        let _ = m.get(0, 1);
    }

    #[test]
    fn parallel_matches_sequential() {
        let hashes: Vec<FuzzyHash> = (0..17u64).map(|i| hash_of(i.wrapping_mul(0x9E37))).collect();
        let seq = build_scores(&hashes, 64, false);
        let par = build_scores(&hashes, 64, true);
        assert_eq!(seq, par);
    }

    #[test]
    fn rebase_shifts_minimum_to_zero() {
        let hashes = vec![hash_of(0), hash_of(0b1), hash_of(0b1111)];
        let mut m = build_scores(&hashes, 64, false);
        let min = m.rebase();
        assert_eq!(min, 60); // worst pair differs by 4 bits
        assert_eq!(m.min_score(), 0);
        assert_eq!(m.get(1, 0), 3);
    }

    #[test]
    fn rebase_on_empty_is_noop() {
        let mut m = build_scores(&[], 64, false);
        assert_eq!(m.rebase(), 0);
        assert!(m.is_empty());
    }

    #[test]
    fn identical_hashes_rebase_to_all_zero() {
        let hashes = vec![hash_of(42), hash_of(42), hash_of(42)];
        let mut m = build_scores(&hashes, 64, false);
        let min = m.rebase();
        assert_eq!(min, 64);
        assert_eq!(m.get(1, 0), 0);
        assert_eq!(m.get(2, 1), 0);
    }
}
