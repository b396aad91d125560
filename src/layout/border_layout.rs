//! Border Layout: up to five children pinned to North/South/East/West/
//! Center regions around a configurable border thickness.

use super::grid_layout::serialize;
use super::{read_budget, Child};
use crate::component::{AlreadyBound, Component, Context, Lifecycle, ReadStatus, SetRect, WriteStatus};
use crate::grid::{CellGrid, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderSlot {
    North,
    South,
    East,
    West,
    Center,
}

pub struct BorderLayout {
    north_height: usize,
    south_height: usize,
    west_width: usize,
    east_width: usize,
    north: Option<Child>,
    south: Option<Child>,
    east: Option<Child>,
    west: Option<Child>,
    center: Option<Child>,
    rect: Rect,
    grid: CellGrid,
    lifecycle: Lifecycle,
    pending: Vec<u8>,
    needs_regen: bool,
}

impl BorderLayout {
    #[allow(clippy::too_many_arguments)]
    pub fn new(north_height: usize, south_height: usize, west_width: usize, east_width: usize) -> Self {
        let mut s = Self {
            north_height,
            south_height,
            west_width,
            east_width,
            north: None,
            south: None,
            east: None,
            west: None,
            center: None,
            rect: Rect::new(0, 0, 1, 1),
            grid: CellGrid::new(1, 1),
            lifecycle: Lifecycle::new(),
            pending: Vec::new(),
            needs_regen: false,
        };
        s.regenerate();
        s
    }

    pub fn with_slot(mut self, slot: BorderSlot, component: Box<dyn Component>) -> Self {
        let child = Some(Child::new(component));
        match slot {
            BorderSlot::North => self.north = child,
            BorderSlot::South => self.south = child,
            BorderSlot::East => self.east = child,
            BorderSlot::West => self.west = child,
            BorderSlot::Center => self.center = child,
        }
        self.regenerate();
        self
    }

    fn slot_rects(&self) -> Option<[(BorderSlot, Rect); 5]> {
        let w = self.rect.width;
        let h = self.rect.height;
        let mid_h = h.checked_sub(self.north_height + self.south_height)?;
        let mid_w = w.checked_sub(self.west_width + self.east_width)?;
        if mid_h == 0 || mid_w == 0 {
            return None;
        }
        let r = self.rect.row;
        let c = self.rect.col;
        Some([
            (BorderSlot::North, Rect::new(r, c, w, self.north_height)),
            (BorderSlot::South, Rect::new(r + h - self.south_height, c, w, self.south_height)),
            (BorderSlot::West, Rect::new(r + self.north_height, c, self.west_width, mid_h)),
            (
                BorderSlot::East,
                Rect::new(r + self.north_height, c + w - self.east_width, self.east_width, mid_h),
            ),
            (BorderSlot::Center, Rect::new(r + self.north_height, c + self.west_width, mid_w, mid_h)),
        ])
    }

    fn child_mut(&mut self, slot: BorderSlot) -> Option<&mut Child> {
        match slot {
            BorderSlot::North => self.north.as_mut(),
            BorderSlot::South => self.south.as_mut(),
            BorderSlot::East => self.east.as_mut(),
            BorderSlot::West => self.west.as_mut(),
            BorderSlot::Center => self.center.as_mut(),
        }
    }

    fn regenerate(&mut self) {
        if let Some(rects) = self.slot_rects() {
            for (slot, sub_rect) in rects {
                if sub_rect.is_empty() {
                    continue;
                }
                let Some(child) = self.child_mut(slot) else { continue };
                child.propagate_rect(sub_rect);
                let mut buf = vec![0u8; read_budget(sub_rect.width, sub_rect.height)];
                let (n, _) = child.component.read(&mut buf);
                super::blit_lines(
                    &mut self.grid,
                    &buf[..n],
                    sub_rect.row - self.rect.row,
                    sub_rect.col - self.rect.col,
                    sub_rect.width,
                    sub_rect.height,
                );
            }
        }
        self.pending = serialize(&self.grid);
    }

    fn each_child_mut(&mut self) -> impl Iterator<Item = &mut Child> {
        [&mut self.north, &mut self.south, &mut self.east, &mut self.west, &mut self.center]
            .into_iter()
            .flatten()
    }
}

impl SetRect for BorderLayout {
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

impl Component for BorderLayout {
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
        for child in self.each_child_mut() {
            let (_, status) = child.component.write(cmd);
            if status == WriteStatus::EndOfStream {
                return (0, WriteStatus::EndOfStream);
            }
        }
        (cmd.len(), WriteStatus::Ok)
    }

    fn close(&mut self) {
        self.lifecycle.close();
        for child in self.each_child_mut() {
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
    fn slot_rects_partition_the_rect() {
        let mut b = BorderLayout::new(1, 1, 5, 5);
        b.set_rect(Rect::new(0, 0, 40, 10));
        let rects = b.slot_rects().unwrap();
        let center = rects.iter().find(|(s, _)| *s == BorderSlot::Center).unwrap().1;
        assert_eq!(center, Rect::new(1, 5, 30, 8));
    }

    #[test]
    fn too_thick_border_skips_tick() {
        let mut b = BorderLayout::new(5, 5, 5, 5);
        b.set_rect(Rect::new(0, 0, 8, 8));
        assert!(b.slot_rects().is_none());
    }

    #[test]
    fn write_fans_out_to_present_slots_only() {
        let mut b = BorderLayout::new(0, 0, 0, 0)
            .with_slot(BorderSlot::Center, Box::new(Spinner::new("c")));
        b.set_rect(Rect::new(0, 0, 20, 4));
        let (n, status) = b.write(b"STATE:SUCCESS");
        assert_eq!(status, WriteStatus::Ok);
        assert_eq!(n, b"STATE:SUCCESS".len());
    }
}
