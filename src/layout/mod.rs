//! Layout: components that partition a rectangle among child components
//! using plain rectangle arithmetic — not a flexbox-style constraint
//! solver. Grid/Stack/Border layouts are each a fixed formula over
//! `(rows, columns, spacing)` or a named region slot, so there is no role
//! here for a general constraint engine; see DESIGN.md for the dependency
//! this displaced.

pub mod border_layout;
pub mod grid_layout;
pub mod stack_layout;

pub use border_layout::{BorderLayout, BorderSlot};
pub use grid_layout::GridLayout;
pub use stack_layout::{StackDirection, StackLayout};

use crate::component::{Component, SetRect};
use crate::grid::Rect;

/// One child slot: the component plus whatever capability discovery the
/// container needs to recurse `set_rect` into nested layouts. Resize
/// propagates down the whole tree before the next tick, not lazily.
pub struct Child {
    pub component: Box<dyn Component>,
}

impl Child {
    pub fn new(component: Box<dyn Component>) -> Self {
        Self { component }
    }

    fn propagate_rect(&mut self, rect: Rect) {
        if let Some(sr) = self.component.as_set_rect() {
            sr.set_rect(rect);
        }
    }
}

/// Upper bound on bytes read from a child per tick: a safe bound for UTF-8
/// runes plus line terminators for a `cell_w x cell_h` slot.
pub(crate) fn read_budget(cell_w: usize, cell_h: usize) -> usize {
    cell_h * (cell_w * 4 + 1)
}

/// Splits `bytes` on `\n` and writes up to `cell_w` runes of each of the
/// first `cell_h` lines into `grid` at `(target_row + j, target_col)`.
/// Excess runes per line, and lines beyond `cell_h`, are truncated.
pub(crate) fn blit_lines(
    grid: &mut crate::grid::CellGrid,
    bytes: &[u8],
    target_row: usize,
    target_col: usize,
    cell_w: usize,
    cell_h: usize,
) {
    let text = String::from_utf8_lossy(bytes);
    for (j, line) in text.split('\n').enumerate() {
        if j >= cell_h {
            break;
        }
        let runes: Vec<char> = line.chars().take(cell_w).collect();
        if runes.is_empty() {
            continue;
        }
        grid.write_runes_at(target_row + j, target_col, &runes);
    }
}
