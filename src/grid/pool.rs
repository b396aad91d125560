//! Process-wide pool of row-arrays, bucketed by size, so the render loop's
//! 16ms tick never needs to allocate a fresh 2D rune buffer.
//!
//! Ownership model: a grid's backing `Vec<Vec<char>>` is exclusively owned
//! by whichever `CellGrid` currently holds it. `acquire` hands out an owned
//! array; `release` takes it back. There is no aliasing between a live grid
//! and the pool — unlike the source implementation's shared row-arrays,
//! this pool never lets two grids observe the same allocation at once.

use crate::error::{EngineError, EngineResult};
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};

/// A free row-array: `rows` outer slots, each an inner `Vec<char>`.
pub type RowArray = Vec<Vec<char>>;

const SMALL_MAX_CELLS: usize = 400;
const MEDIUM_MAX_CELLS: usize = 1920;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Small,
    Medium,
    Large,
}

fn bucket_for(rows: usize, cols: usize) -> Bucket {
    let cells = rows.saturating_mul(cols);
    if cells <= SMALL_MAX_CELLS {
        Bucket::Small
    } else if cells <= MEDIUM_MAX_CELLS {
        Bucket::Medium
    } else {
        Bucket::Large
    }
}

/// Size-bucketed free-list of row-arrays, safe to share across tasks.
pub struct GridPool {
    small: Mutex<Vec<RowArray>>,
    medium: Mutex<Vec<RowArray>>,
    large: Mutex<Vec<RowArray>>,
}

impl GridPool {
    pub fn new() -> Self {
        Self {
            small: Mutex::new(Vec::new()),
            medium: Mutex::new(Vec::new()),
            large: Mutex::new(Vec::new()),
        }
    }

    fn bucket(&self, b: Bucket) -> &Mutex<Vec<RowArray>> {
        match b {
            Bucket::Small => &self.small,
            Bucket::Medium => &self.medium,
            Bucket::Large => &self.large,
        }
    }

    /// Return a row-array with at least `rows` outer slots, each inner row
    /// having at least `cols` runes. Rune contents are arbitrary; callers
    /// that need cleared cells must clear explicitly (`CellGrid` always
    /// does on acquire).
    pub fn acquire(&self, rows: usize, cols: usize) -> RowArray {
        let bucket = self.bucket(bucket_for(rows, cols));
        let mut free = bucket.lock();
        let mut grid = free.pop().unwrap_or_default();

        if grid.len() < rows {
            grid.resize_with(rows, Vec::new);
        } else {
            grid.truncate(rows);
        }
        for row in grid.iter_mut() {
            if row.len() < cols {
                row.resize(cols, ' ');
            }
        }
        grid
    }

    /// Like [`acquire`](Self::acquire), but reserves capacity with
    /// `try_reserve` instead of `resize_with`/`resize`, so a request the
    /// allocator can't satisfy returns `Err(EngineError::PoolExhausted)`
    /// instead of aborting the process. `CellGrid::try_new`/`try_with_pool`
    /// are the only callers; every other construction path in this crate
    /// goes through the infallible `acquire` above, since the grids it
    /// builds are bounded by a real terminal's size or a tiny fixed
    /// placeholder and cannot realistically exhaust memory.
    pub fn try_acquire(&self, rows: usize, cols: usize) -> EngineResult<RowArray> {
        let bucket = self.bucket(bucket_for(rows, cols));
        let mut free = bucket.lock();
        let mut grid = free.pop().unwrap_or_default();

        if grid.len() < rows {
            let additional = rows - grid.len();
            grid.try_reserve(additional).map_err(|_| EngineError::PoolExhausted)?;
            grid.resize_with(rows, Vec::new);
        } else {
            grid.truncate(rows);
        }
        for row in grid.iter_mut() {
            if row.len() < cols {
                let additional = cols - row.len();
                row.try_reserve(additional).map_err(|_| EngineError::PoolExhausted)?;
                row.resize(cols, ' ');
            }
        }
        Ok(grid)
    }

    /// Space-fill every cell, then return the array to its size bucket.
    /// A nil/empty grid is simply dropped.
    pub fn release(&self, mut grid: RowArray) {
        if grid.is_empty() {
            return;
        }
        let rows = grid.len();
        let cols = grid.iter().map(|r| r.len()).max().unwrap_or(0);
        for row in grid.iter_mut() {
            row.iter_mut().for_each(|c| *c = ' ');
        }
        let bucket = self.bucket(bucket_for(rows, cols));
        bucket.lock().push(grid);
    }
}

impl Default for GridPool {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_POOL: OnceLock<Arc<GridPool>> = OnceLock::new();

/// The process-wide pool, initialized lazily on first use. Cheap to clone
/// (an `Arc` bump); engines that want isolation for tests should construct
/// their own `Arc::new(GridPool::new())` instead of calling this.
pub fn global_pool() -> Arc<GridPool> {
    GLOBAL_POOL.get_or_init(|| Arc::new(GridPool::new())).clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_meets_minimum_dimensions() {
        let pool = GridPool::new();
        let g = pool.acquire(5, 10);
        assert_eq!(g.len(), 5);
        assert!(g.iter().all(|r| r.len() >= 10));
    }

    #[test]
    fn release_then_acquire_reuses_allocation() {
        let pool = GridPool::new();
        let g = pool.acquire(3, 3);
        pool.release(g);
        assert_eq!(pool.small.lock().len(), 1);
        let g2 = pool.acquire(3, 3);
        assert_eq!(pool.small.lock().len(), 0);
        assert_eq!(g2.len(), 3);
    }

    #[test]
    fn release_space_fills_every_cell() {
        let pool = GridPool::new();
        let mut g = pool.acquire(2, 2);
        g[0][0] = 'X';
        g[1][1] = 'Y';
        pool.release(g);
        let g2 = pool.acquire(2, 2);
        assert!(g2.iter().all(|r| r.iter().all(|&c| c == ' ')));
    }

    #[test]
    fn release_ignores_empty_grid() {
        let pool = GridPool::new();
        pool.release(Vec::new());
        assert_eq!(pool.small.lock().len(), 0);
        assert_eq!(pool.medium.lock().len(), 0);
        assert_eq!(pool.large.lock().len(), 0);
    }

    #[test]
    fn try_acquire_meets_minimum_dimensions() {
        let pool = GridPool::new();
        let g = pool.try_acquire(5, 10).unwrap();
        assert_eq!(g.len(), 5);
        assert!(g.iter().all(|r| r.len() >= 10));
    }

    #[test]
    fn try_acquire_reports_pool_exhausted_on_outlandish_row_count() {
        let pool = GridPool::new();
        let err = pool.try_acquire(usize::MAX, 10).unwrap_err();
        assert!(matches!(err, EngineError::PoolExhausted));
    }

    #[test]
    fn try_acquire_reports_pool_exhausted_on_outlandish_col_count() {
        let pool = GridPool::new();
        let err = pool.try_acquire(1, usize::MAX).unwrap_err();
        assert!(matches!(err, EngineError::PoolExhausted));
    }

    #[test]
    fn buckets_select_by_cell_count() {
        assert_eq!(bucket_for(10, 10), Bucket::Small); // 100 cells
        assert_eq!(bucket_for(40, 40), Bucket::Medium); // 1600 cells
        assert_eq!(bucket_for(100, 100), Bucket::Large); // 10000 cells
    }
}
