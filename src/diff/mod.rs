//! Rune-level diff kernel: pure functions over equal-length rune arrays,
//! with an optional SIMD path (see [`simd`]) that must match [`scalar`]
//! bit-for-bit. The scalar module is the normative reference — see the
//! open question in the design notes.

pub mod scalar;
pub mod simd;

pub use scalar::DiffRun;

use crate::grid::{CellGrid, DirtyRegion};

/// Below this length the lane setup/teardown in [`simd`] costs more than
/// it saves, so we just run scalar.
const SIMD_MIN_LEN: usize = 32;

fn simd_worthwhile(a: &[char], b: &[char]) -> bool {
    cfg!(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64"))
        && a.len().min(b.len()) >= SIMD_MIN_LEN
}

/// `false` if lengths differ; otherwise `true` iff all runes match.
pub fn equal(a: &[char], b: &[char]) -> bool {
    if simd_worthwhile(a, b) {
        simd::equal(a, b)
    } else {
        scalar::equal(a, b)
    }
}

/// Smallest index where `a[i] != b[i]`, or `None` (a sentinel `-1` in
/// array-index terms) if identical; if one is a proper prefix of the
/// other, the shorter length.
pub fn first_diff(a: &[char], b: &[char]) -> Option<usize> {
    if simd_worthwhile(a, b) {
        simd::first_diff(a, b)
    } else {
        scalar::first_diff(a, b)
    }
}

/// All maximal mismatched runs within the overlap, plus a tail run if the
/// lengths differ.
pub fn differences(a: &[char], b: &[char]) -> Vec<DiffRun> {
    simd::differences(a, b)
}

fn row_bounds(old: &[char], new: &[char]) -> Option<(usize, usize)> {
    let runs = differences(old, new);
    if runs.is_empty() {
        return None;
    }
    let start = runs.first().unwrap().start;
    let end = runs.iter().map(|r| r.start + r.len).max().unwrap();
    Some((start, end - start))
}

/// Row-to-region reducer: for each row, computes the bounding column span
/// of its differences, then vertically coalesces consecutive rows whose
/// span has identical `(start, length)` into a single [`DirtyRegion`]. If
/// `a` and `b` differ in dimensions, returns a single region covering the
/// entirety of `a`.
pub fn grid_regions(a: &CellGrid, b: &CellGrid) -> Vec<DirtyRegion> {
    if a.width() != b.width() || a.height() != b.height() {
        return DirtyRegion::whole_grid(a.width(), a.height()).into_iter().collect();
    }

    let mut regions = Vec::new();
    let mut group: Option<(usize, usize, usize, usize)> = None; // (start_row, end_row, col_start, col_len)

    for r in 0..a.height() {
        let old = a.row(r);
        let new = b.row(r);
        let bounds = row_bounds(&old, &new);

        match (&mut group, bounds) {
            (Some((start_row, end_row, col_start, col_len)), Some((b_start, b_len)))
                if *col_start == b_start && *col_len == b_len =>
            {
                *end_row = r;
                let _ = (start_row, end_row);
            }
            (_, Some((b_start, b_len))) => {
                if let Some(g) = group.take() {
                    push_region(&mut regions, g, a.width(), a.height());
                }
                group = Some((r, r, b_start, b_len));
            }
            (_, None) => {
                if let Some(g) = group.take() {
                    push_region(&mut regions, g, a.width(), a.height());
                }
            }
        }
    }
    if let Some(g) = group.take() {
        push_region(&mut regions, g, a.width(), a.height());
    }
    regions
}

fn push_region(
    regions: &mut Vec<DirtyRegion>,
    (start_row, end_row, col_start, col_len): (usize, usize, usize, usize),
    width: usize,
    height: usize,
) {
    if col_len == 0 {
        return;
    }
    if let Some(region) =
        DirtyRegion::clamped(start_row, end_row, col_start, col_start + col_len - 1, width, height)
    {
        regions.push(region);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellGrid;

    #[test]
    fn grid_regions_empty_when_equal() {
        let a = CellGrid::new(10, 5);
        let b = CellGrid::new(10, 5);
        assert!(grid_regions(&a, &b).is_empty());
    }

    #[test]
    fn grid_regions_coalesces_identical_row_runs() {
        let mut a = CellGrid::new(20, 10);
        let b = CellGrid::new(20, 10);
        for row in 5..=7 {
            a.write_runes_at(row, 10, &['x', 'x', 'x', 'x', 'x']);
        }
        let regions = grid_regions(&a, &b);
        assert_eq!(regions.len(), 1);
        let region = regions[0];
        assert_eq!(region.start_row, 5);
        assert_eq!(region.end_row, 7);
        assert_eq!(region.start_col, 10);
        assert_eq!(region.end_col, 14);
    }

    #[test]
    fn grid_regions_mismatched_dims_covers_whole_receiver() {
        let a = CellGrid::new(10, 5);
        let b = CellGrid::new(8, 5);
        let regions = grid_regions(&a, &b);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].start_col, 0);
        assert_eq!(regions[0].end_col, 9);
        assert_eq!(regions[0].end_row, 4);
    }

    #[test]
    fn grid_regions_separates_differing_runs() {
        let mut a = CellGrid::new(10, 3);
        let b = CellGrid::new(10, 3);
        a.write_runes_at(0, 0, &['a']);
        a.write_runes_at(1, 5, &['b', 'b']);
        let regions = grid_regions(&a, &b);
        assert_eq!(regions.len(), 2);
    }

    use proptest::prelude::*;

    fn arb_runes(max_len: usize) -> impl Strategy<Value = Vec<char>> {
        proptest::collection::vec(proptest::char::range('a', 'z'), 0..max_len)
    }

    proptest! {
        #[test]
        fn simd_equal_matches_scalar(a in arb_runes(64), b in arb_runes(64)) {
            prop_assert_eq!(simd::equal(&a, &b), scalar::equal(&a, &b));
        }

        #[test]
        fn simd_first_diff_matches_scalar(a in arb_runes(64), b in arb_runes(64)) {
            prop_assert_eq!(simd::first_diff(&a, &b), scalar::first_diff(&a, &b));
        }

        #[test]
        fn simd_differences_matches_scalar_on_equal_length_inputs(a in arb_runes(64)) {
            let mut b = a.clone();
            for (i, ch) in b.iter_mut().enumerate() {
                if i % 5 == 0 {
                    *ch = 'Z';
                }
            }
            prop_assert_eq!(simd::differences(&a, &b), scalar::differences(&a, &b));
        }
    }
}
