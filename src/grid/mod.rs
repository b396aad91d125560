//! Cell Grid — a pool-backed, bounds-checked 2D array of runes.
//!
//! Every row always has exactly `width` runes; every cell is a space after
//! construction or `clear`. Writes outside the rect are silently discarded:
//! there is no partial row growth and no panicking path for bad coordinates.

mod rect;
pub mod pool;

pub use rect::{DirtyRegion, Rect};
pub use pool::GridPool;

use crate::error::EngineResult;
use parking_lot::RwLock;
use std::sync::Arc;

/// A 2D array of Unicode scalar values with pool-backed storage and a
/// reader/writer discipline: `get_runes` may run concurrently with other
/// reads, but any mutation excludes all readers and other mutators.
pub struct CellGrid {
    width: usize,
    height: usize,
    rows: RwLock<pool::RowArray>,
    dirty: Vec<DirtyRegion>,
    pool: Arc<GridPool>,
}

impl CellGrid {
    /// A zeroed (space-filled) grid of `w x h` cells from the global pool.
    pub fn new(w: usize, h: usize) -> Self {
        Self::with_pool(w, h, pool::global_pool())
    }

    /// Same as [`new`](Self::new) but acquiring from a caller-supplied pool
    /// — the injection point the design notes call for so tests can use an
    /// isolated pool rather than the process-wide one.
    pub fn with_pool(w: usize, h: usize, pool: Arc<GridPool>) -> Self {
        let mut rows = pool.acquire(h, w);
        for row in rows.iter_mut() {
            row.truncate(w);
            row.resize(w, ' ');
        }
        Self { width: w, height: h, rows: RwLock::new(rows), dirty: Vec::new(), pool }
    }

    /// The fallible counterpart of [`new`](Self::new): fails with
    /// `EngineError::PoolExhausted` instead of aborting the process when
    /// the allocator can't satisfy the request. Construction is the only
    /// place this crate offers that choice — `resize`/`clear` keep using
    /// the infallible pool path, since a mid-run reallocation failure has
    /// no defined recovery and a real allocator failure there aborts the
    /// process exactly as any other Rust allocation does.
    pub fn try_new(w: usize, h: usize) -> EngineResult<Self> {
        Self::try_with_pool(w, h, pool::global_pool())
    }

    /// Same as [`try_new`](Self::try_new) but acquiring from a
    /// caller-supplied pool.
    pub fn try_with_pool(w: usize, h: usize, pool: Arc<GridPool>) -> EngineResult<Self> {
        let mut rows = pool.try_acquire(h, w)?;
        for row in rows.iter_mut() {
            row.truncate(w);
            row.resize(w, ' ');
        }
        Ok(Self { width: w, height: h, rows: RwLock::new(rows), dirty: Vec::new(), pool })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn mark_dirty(&mut self, start_row: usize, end_row: usize, start_col: usize, end_col: usize) {
        if let Some(region) =
            DirtyRegion::clamped(start_row, end_row, start_col, end_col, self.width, self.height)
        {
            self.dirty.push(region);
        }
    }

    /// All regions touched since the grid was built/cleared/resized.
    pub fn dirty_regions(&self) -> &[DirtyRegion] {
        &self.dirty
    }

    pub fn take_dirty_regions(&mut self) -> Vec<DirtyRegion> {
        std::mem::take(&mut self.dirty)
    }

    /// Force a single cell dirty without changing its content — used by
    /// the framebuffer to propagate cursor moves into the repaint set.
    pub(crate) fn mark_region_dirty(&mut self, row: usize, col: usize) {
        self.mark_dirty(row, row, col, col);
    }

    /// Space-fill one row and mark it dirty, without touching the others.
    pub(crate) fn clear_row(&mut self, row: usize) {
        if row >= self.height {
            return;
        }
        {
            let mut rows = self.rows.write();
            rows[row].iter_mut().for_each(|c| *c = ' ');
        }
        if self.width > 0 {
            self.mark_dirty(row, row, 0, self.width - 1);
        }
    }

    /// Copy `runes[0..min(len, width-col)]` into `row` starting at `col`.
    /// Out-of-range calls (row/col beyond bounds) are no-ops.
    pub fn write_runes_at(&mut self, row: usize, col: usize, runes: &[char]) {
        if row >= self.height || col >= self.width || runes.is_empty() {
            return;
        }
        let n = runes.len().min(self.width - col);
        if n == 0 {
            return;
        }
        {
            let mut rows = self.rows.write();
            rows[row][col..col + n].copy_from_slice(&runes[..n]);
        }
        self.mark_dirty(row, row, col, col + n - 1);
    }

    /// Decode `bytes` as UTF-8, clear the grid, then write left-to-right,
    /// wrapping at `\n` to column 0 of the next row, discarding runes past
    /// the last row. Invalid UTF-8 sequences are skipped. Marks the whole
    /// grid dirty.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.clear();
        let text = String::from_utf8_lossy(bytes);
        let mut row = 0usize;
        let mut col = 0usize;
        let mut rows = self.rows.write();
        for ch in text.chars() {
            if ch == '\u{fffd}' {
                // Lossy-decode replacement for invalid bytes: skip it.
                continue;
            }
            if ch == '\n' {
                row += 1;
                col = 0;
                if row >= self.height {
                    break;
                }
                continue;
            }
            if row >= self.height {
                break;
            }
            if col < self.width {
                rows[row][col] = ch;
                col += 1;
            }
            // runes past width are simply discarded (no wrap mid-line).
        }
        drop(rows);
        if self.width > 0 && self.height > 0 {
            self.mark_dirty(0, self.height - 1, 0, self.width - 1);
        }
    }

    /// Read-only view of `row` from `start_col` to `min(end_col+1, width)`.
    /// Empty if arguments are inverted or out of range.
    pub fn get_runes(&self, row: usize, start_col: usize, end_col: usize) -> Vec<char> {
        if row >= self.height || start_col > end_col || start_col >= self.width {
            return Vec::new();
        }
        let end = (end_col + 1).min(self.width);
        let rows = self.rows.read();
        rows[row][start_col..end].to_vec()
    }

    /// Return all rows to the pool and acquire a fresh grid of the same
    /// dimensions; every cell becomes space, dirty set empties.
    pub fn clear(&mut self) {
        let old = {
            let mut rows = self.rows.write();
            std::mem::take(&mut *rows)
        };
        self.pool.release(old);
        let fresh = self.pool.acquire(self.height, self.width);
        let mut fresh_trimmed = fresh;
        for row in fresh_trimmed.iter_mut() {
            row.truncate(self.width);
            row.resize(self.width, ' ');
        }
        *self.rows.write() = fresh_trimmed;
        self.dirty.clear();
    }

    /// No-op if dimensions are unchanged. Otherwise acquires a new grid,
    /// copies the top-left intersection, releases the old grid, and marks
    /// the whole new grid dirty.
    pub fn resize(&mut self, new_w: usize, new_h: usize) {
        if new_w == self.width && new_h == self.height {
            return;
        }
        let mut new_rows = self.pool.acquire(new_h, new_w);
        for row in new_rows.iter_mut() {
            row.truncate(new_w);
            row.resize(new_w, ' ');
        }

        let old_rows = {
            let mut rows = self.rows.write();
            std::mem::take(&mut *rows)
        };

        let copy_w = self.width.min(new_w);
        let copy_h = self.height.min(new_h);
        for r in 0..copy_h {
            new_rows[r][..copy_w].copy_from_slice(&old_rows[r][..copy_w]);
        }

        self.pool.release(old_rows);
        *self.rows.write() = new_rows;
        self.width = new_w;
        self.height = new_h;
        self.dirty.clear();
        if new_w > 0 && new_h > 0 {
            self.mark_dirty(0, new_h - 1, 0, new_w - 1);
        }
    }

    /// Row-to-region diff against `other`: see [`crate::diff`] for the
    /// underlying algorithm. If dimensions differ, returns a single region
    /// covering this entire grid.
    pub fn compare_with(&self, other: &CellGrid) -> Vec<DirtyRegion> {
        crate::diff::grid_regions(self, other)
    }

    pub(crate) fn row(&self, r: usize) -> Vec<char> {
        self.rows.read()[r].clone()
    }
}

impl Drop for CellGrid {
    fn drop(&mut self) {
        let rows = std::mem::take(&mut *self.rows.write());
        self.pool.release(rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_spaces() {
        let g = CellGrid::new(5, 3);
        for r in 0..3 {
            assert_eq!(g.get_runes(r, 0, 4), vec![' '; 5]);
        }
    }

    #[test]
    fn write_runes_at_keeps_row_width() {
        let mut g = CellGrid::new(6, 2);
        g.write_runes_at(0, 0, &['a', 'b', 'c']);
        assert_eq!(g.row(0).len(), 6);
        assert_eq!(g.get_runes(0, 0, 2), vec!['a', 'b', 'c']);
    }

    #[test]
    fn write_at_col_eq_width_is_noop() {
        let mut g = CellGrid::new(4, 1);
        g.write_runes_at(0, 4, &['x']);
        assert_eq!(g.get_runes(0, 0, 3), vec![' '; 4]);
    }

    #[test]
    fn write_at_col_eq_width_minus_one_fills_one_cell() {
        let mut g = CellGrid::new(4, 1);
        g.write_runes_at(0, 3, &['x', 'y']);
        assert_eq!(g.get_runes(0, 0, 3), vec![' ', ' ', ' ', 'x']);
    }

    #[test]
    fn write_bytes_wraps_on_newline() {
        let mut g = CellGrid::new(5, 3);
        g.write_bytes(b"hi\nthere\nextra line that is too long");
        assert_eq!(g.get_runes(0, 0, 1), vec!['h', 'i']);
        assert_eq!(g.get_runes(1, 0, 4), vec!['t', 'h', 'e', 'r', 'e']);
    }

    #[test]
    fn write_bytes_skips_invalid_utf8() {
        let mut g = CellGrid::new(4, 1);
        let mut bytes = vec![b'o', b'k'];
        bytes.push(0xFF);
        bytes.push(b'!');
        g.write_bytes(&bytes);
        assert_eq!(g.get_runes(0, 0, 2), vec!['o', 'k', '!']);
    }

    #[test]
    fn get_runes_out_of_range_is_empty() {
        let g = CellGrid::new(3, 3);
        assert!(g.get_runes(5, 0, 1).is_empty());
        assert!(g.get_runes(0, 2, 1).is_empty());
    }

    #[test]
    fn resize_noop_when_unchanged() {
        let mut g = CellGrid::new(4, 4);
        g.write_runes_at(0, 0, &['z']);
        g.take_dirty_regions();
        g.resize(4, 4);
        assert!(g.dirty_regions().is_empty());
    }

    #[test]
    fn resize_preserves_top_left_intersection() {
        let mut g = CellGrid::new(5, 2);
        g.write_runes_at(0, 0, &['a', 'b', 'c', 'd', 'e']);
        g.resize(8, 4);
        assert_eq!(g.width(), 8);
        assert_eq!(g.height(), 4);
        assert_eq!(g.get_runes(0, 0, 4), vec!['a', 'b', 'c', 'd', 'e']);
        assert_eq!(g.get_runes(0, 5, 7), vec![' ', ' ', ' ']);
    }

    #[test]
    fn try_new_succeeds_for_ordinary_sizes() {
        let g = CellGrid::try_new(80, 24).unwrap();
        assert_eq!((g.width(), g.height()), (80, 24));
    }

    #[test]
    fn try_new_reports_pool_exhausted_for_an_unsatisfiable_request() {
        let err = CellGrid::try_new(usize::MAX, usize::MAX).unwrap_err();
        assert!(matches!(err, crate::error::EngineError::PoolExhausted));
    }

    #[test]
    fn clear_resets_all_cells_and_dirty_set() {
        let mut g = CellGrid::new(3, 1);
        g.write_runes_at(0, 0, &['q']);
        g.clear();
        assert_eq!(g.get_runes(0, 0, 2), vec![' ', ' ', ' ']);
        assert!(g.dirty_regions().is_empty());
    }
}
