//! Stack Layout: tiles children along one axis with spacing, the simpler
//! of the two non-Border specialisations.

use super::grid_layout::serialize;
use super::{read_budget, Child};
use crate::component::{AlreadyBound, Component, Context, Lifecycle, ReadStatus, SetRect, WriteStatus};
use crate::grid::{CellGrid, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackDirection {
    Vertical,
    Horizontal,
}

pub struct StackLayout {
    direction: StackDirection,
    spacing: usize,
    children: Vec<Child>,
    rect: Rect,
    grid: CellGrid,
    lifecycle: Lifecycle,
    pending: Vec<u8>,
    needs_regen: bool,
}

impl StackLayout {
    pub fn new(direction: StackDirection, spacing: usize, children: Vec<Box<dyn Component>>) -> Self {
        let mut s = Self {
            direction,
            spacing,
            children: children.into_iter().map(Child::new).collect(),
            rect: Rect::new(0, 0, 1, 1),
            grid: CellGrid::new(1, 1),
            lifecycle: Lifecycle::new(),
            pending: Vec::new(),
            needs_regen: false,
        };
        s.regenerate();
        s
    }

    fn slot_size(&self) -> Option<(usize, usize)> {
        let n = self.children.len();
        if n == 0 {
            return None;
        }
        match self.direction {
            StackDirection::Vertical => {
                let spacing_h = self.spacing * n.saturating_sub(1);
                if self.rect.height <= spacing_h || self.rect.width == 0 {
                    return None;
                }
                let cell_h = (self.rect.height - spacing_h) / n;
                if cell_h == 0 {
                    return None;
                }
                Some((self.rect.width, cell_h))
            }
            StackDirection::Horizontal => {
                let spacing_w = self.spacing * n.saturating_sub(1);
                if self.rect.width <= spacing_w || self.rect.height == 0 {
                    return None;
                }
                let cell_w = (self.rect.width - spacing_w) / n;
                if cell_w == 0 {
                    return None;
                }
                Some((cell_w, self.rect.height))
            }
        }
    }

    fn regenerate(&mut self) {
        if let Some((cell_w, cell_h)) = self.slot_size() {
            let mut buf = vec![0u8; read_budget(cell_w, cell_h)];
            for (i, child) in self.children.iter_mut().enumerate() {
                let (target_row, target_col) = match self.direction {
                    StackDirection::Vertical => (i * (cell_h + self.spacing), 0),
                    StackDirection::Horizontal => (0, i * (cell_w + self.spacing)),
                };
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

impl SetRect for StackLayout {
    fn set_rect(&mut self, rect: Rect) {
        if rect.is_empty() {
            self.grid.resize(1, 1);
        } else {
            self.rect = rect;
            self.grid.resize(rect.width, rect.height);
        }
        self.regenerate();
    }
}

impl Component for StackLayout {
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
    fn vertical_slots_split_height_evenly() {
        let mut s = StackLayout::new(
            StackDirection::Vertical,
            1,
            vec![Box::new(Spinner::new("a")), Box::new(Spinner::new("b")), Box::new(Spinner::new("c"))],
        );
        s.set_rect(Rect::new(0, 0, 10, 10));
        assert_eq!(s.slot_size(), Some((10, 3)));
    }

    #[test]
    fn horizontal_slots_split_width_evenly() {
        let mut s = StackLayout::new(
            StackDirection::Horizontal,
            0,
            vec![Box::new(Spinner::new("a")), Box::new(Spinner::new("b"))],
        );
        s.set_rect(Rect::new(0, 0, 10, 4));
        assert_eq!(s.slot_size(), Some((5, 4)));
    }

    #[test]
    fn empty_stack_skips_tick() {
        let mut s = StackLayout::new(StackDirection::Vertical, 0, vec![]);
        s.set_rect(Rect::new(0, 0, 10, 10));
        assert!(s.slot_size().is_none());
    }
}
