//! Grid Layout: tiles a fixed `rows x columns` matrix of children into
//! equal cells, separated by `spacing` columns/rows.

use super::{read_budget, Child};
use crate::component::{AlreadyBound, Component, Context, Lifecycle, ReadStatus, SetRect, WriteStatus};
use crate::grid::{CellGrid, Rect};

const HOME_THEN_CLEAR: &str = "\x1b[H\x1b[2J";

pub struct GridLayout {
    rows: usize,
    cols: usize,
    spacing: usize,
    children: Vec<Child>,
    rect: Rect,
    grid: CellGrid,
    lifecycle: Lifecycle,
    pending: Vec<u8>,
    needs_regen: bool,
}

impl GridLayout {
    pub fn new(rows: usize, cols: usize, spacing: usize, children: Vec<Box<dyn Component>>) -> Self {
        let rect = Rect::new(0, 0, 1, 1);
        let mut s = Self {
            rows: rows.max(1),
            cols: cols.max(1),
            spacing,
            children: children.into_iter().map(Child::new).collect(),
            rect,
            grid: CellGrid::new(1, 1),
            lifecycle: Lifecycle::new(),
            pending: Vec::new(),
            needs_regen: false,
        };
        s.regenerate();
        s
    }

    /// The cell size each child occupies, or `None` if this tick should be
    /// skipped (zero or negative cell dimensions, or a zero-sized row/
    /// column count).
    fn cell_size(&self) -> Option<(usize, usize)> {
        if self.rows == 0 || self.cols == 0 {
            return None;
        }
        let w = self.rect.width;
        let h = self.rect.height;
        let spacing_w = self.spacing * self.cols.saturating_sub(1);
        let spacing_h = self.spacing * self.rows.saturating_sub(1);
        if w <= spacing_w || h <= spacing_h {
            return None;
        }
        let cell_w = (w - spacing_w) / self.cols;
        let cell_h = (h - spacing_h) / self.rows;
        if cell_w == 0 || cell_h == 0 {
            return None;
        }
        Some((cell_w, cell_h))
    }

    fn regenerate(&mut self) {
        if let Some((cell_w, cell_h)) = self.cell_size() {
            let mut buf = vec![0u8; read_budget(cell_w, cell_h)];
            for (i, child) in self.children.iter_mut().enumerate().take(self.rows * self.cols) {
                let target_row = (i / self.cols) * (cell_h + self.spacing);
                let target_col = (i % self.cols) * (cell_w + self.spacing);

                child.propagate_rect(Rect::new(
                    self.rect.row + target_row,
                    self.rect.col + target_col,
                    cell_w,
                    cell_h,
                ));

                let (n, _) = child.component.read(&mut buf);
                super::blit_lines(&mut self.grid, &buf[..n], target_row, target_col, cell_w, cell_h);
            }
        }
        self.pending = serialize(&self.grid);
    }
}

/// Shared with Stack/Border layouts: a component's read format — home+clear
/// prefix, then each row's runes, `\r\n`-separated, no trailing terminator.
pub(super) fn serialize(grid: &CellGrid) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(HOME_THEN_CLEAR.as_bytes());
    for r in 0..grid.height() {
        if r > 0 {
            out.extend_from_slice(b"\r\n");
        }
        let runes = grid.get_runes(r, 0, grid.width().saturating_sub(1));
        let line: String = runes.into_iter().collect();
        out.extend_from_slice(line.as_bytes());
    }
    out
}

impl SetRect for GridLayout {
    fn set_rect(&mut self, rect: Rect) {
        if rect.is_empty() {
            // Downgrade to 1x1 but keep the prior rect so a later expansion
            // has the real dimensions to restore.
            self.grid.resize(1, 1);
        } else {
            self.rect = rect;
            self.grid.resize(rect.width, rect.height);
        }
        self.regenerate();
    }
}

impl Component for GridLayout {
    fn read(&mut self, buf: &mut [u8]) -> (usize, ReadStatus) {
        if self.lifecycle.is_closed() {
            return (0, ReadStatus::EndOfStream);
        }
        if self.needs_regen {
            self.regenerate();
            self.needs_regen = false;
        }
        if self.pending.is_empty() {
            self.needs_regen = true;
            return (0, ReadStatus::Ok);
        }
        let n = self.pending.len().min(buf.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        (n, ReadStatus::Ok)
    }

    fn write(&mut self, cmd: &[u8]) -> (usize, WriteStatus) {
        if self.lifecycle.is_closed() {
            return (0, WriteStatus::EndOfStream);
        }
        for child in &mut self.children {
            let (_, status) = child.component.write(cmd);
            if status == WriteStatus::EndOfStream {
                return (0, WriteStatus::EndOfStream);
            }
        }
        (cmd.len(), WriteStatus::Ok)
    }

    fn close(&mut self) {
        self.lifecycle.close();
        for child in &mut self.children {
            child.component.close();
        }
    }

    fn bind(&mut self, ctx: Context) -> Result<(), AlreadyBound> {
        self.lifecycle.bind(ctx)
    }

    fn as_set_rect(&mut self) -> Option<&mut dyn SetRect> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::demo::Spinner;

    #[test]
    fn zero_dimension_rect_skips_tick_but_keeps_prior_rect() {
        let mut g = GridLayout::new(1, 2, 0, vec![Box::new(Spinner::new("a")), Box::new(Spinner::new("b"))]);
        g.set_rect(Rect::new(0, 0, 20, 4));
        g.set_rect(Rect::new(0, 0, 0, 0));
        // internal grid downgraded, but the layout remembers a real rect
        // to expand back into.
        assert_eq!(g.rect, Rect::new(0, 0, 20, 4));
    }

    #[test]
    fn children_placed_at_expected_columns() {
        let mut g = GridLayout::new(1, 2, 1, vec![Box::new(Spinner::new("left")), Box::new(Spinner::new("right"))]);
        g.set_rect(Rect::new(0, 0, 21, 1));
        let (cell_w, _) = g.cell_size().unwrap();
        assert_eq!(cell_w, 10);
    }

    #[test]
    fn read_emits_home_clear_prefix() {
        let mut g = GridLayout::new(1, 1, 0, vec![Box::new(Spinner::new("only"))]);
        g.set_rect(Rect::new(0, 0, 20, 3));
        let mut buf = [0u8; 512];
        let (n, status) = g.read(&mut buf);
        assert_eq!(status, ReadStatus::Ok);
        assert!(String::from_utf8_lossy(&buf[..n]).starts_with(HOME_THEN_CLEAR));
    }

    #[test]
    fn write_fans_out_to_all_children() {
        let mut g = GridLayout::new(1, 2, 0, vec![Box::new(Spinner::new("a")), Box::new(Spinner::new("b"))]);
        g.set_rect(Rect::new(0, 0, 20, 1));
        g.write(b"STATE:SUCCESS");
        let mut buf = [0u8; 512];
        let (n, _) = g.read(&mut buf);
        assert!(String::from_utf8_lossy(&buf[..n]).contains('✓'));
    }

    #[test]
    fn close_propagates_to_children() {
        let mut g = GridLayout::new(1, 1, 0, vec![Box::new(Spinner::new("a"))]);
        g.close();
        let mut buf = [0u8; 16];
        assert_eq!(g.read(&mut buf), (0, ReadStatus::EndOfStream));
    }

    #[test]
    fn grid_2x2_spacing_1_in_21x11_places_children_at_literal_origins() {
        let mut g = GridLayout::new(
            2,
            2,
            1,
            vec![
                Box::new(Spinner::new("a")),
                Box::new(Spinner::new("b")),
                Box::new(Spinner::new("c")),
                Box::new(Spinner::new("d")),
            ],
        );
        g.set_rect(Rect::new(0, 0, 21, 11));

        let (cell_w, cell_h) = g.cell_size().unwrap();
        assert_eq!((cell_w, cell_h), (10, 5));
        let origins: Vec<(usize, usize)> =
            (0..4).map(|i| ((i / 2) * (cell_h + 1), (i % 2) * (cell_w + 1))).collect();
        assert_eq!(origins, vec![(0, 0), (0, 11), (6, 0), (6, 11)]);
    }
}
