//! A minimal spinner-like component used by this crate's own tests (and
//! the `demos/` binary) as a concrete `Component` implementation — not
//! exported as a real widget, since widget semantics beyond the grid are
//! out of scope for this crate.

use super::{AlreadyBound, Component, Context, Lifecycle, ReadStatus, WriteStatus};
use crate::grid::CellGrid;

/// Prefix order is `HOME` then `CLEAR` — the opposite order from the
/// framebuffer's own `CLEAR_SCREEN_HOME` sequence. A component's own frame
/// serialisation and the framebuffer's screen-clear vocabulary are
/// deliberately distinct constants.
const HOME_THEN_CLEAR: &str = "\x1b[H\x1b[2J";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerState {
    Running,
    Success,
    Failure,
}

impl SpinnerState {
    fn indicator(self) -> char {
        match self {
            SpinnerState::Running => '⠋',
            SpinnerState::Success => '✓',
            SpinnerState::Failure => '✗',
        }
    }
}

/// A minimal component: an indicator glyph plus a label, recognising the
/// `LABEL:<text>` and `STATE:SUCCESS|FAILURE|RUNNING` command grammar.
pub struct Spinner {
    label: String,
    state: SpinnerState,
    grid: CellGrid,
    lifecycle: Lifecycle,
    pending: Vec<u8>,
    needs_regen: bool,
}

impl Spinner {
    pub fn new(label: impl Into<String>) -> Self {
        let mut s = Self {
            label: label.into(),
            state: SpinnerState::Running,
            grid: CellGrid::new(1, 1),
            lifecycle: Lifecycle::new(),
            pending: Vec::new(),
            needs_regen: false,
        };
        s.regenerate();
        s
    }

    fn content(&self) -> String {
        format!("{} {}", self.state.indicator(), self.label)
    }

    fn regenerate(&mut self) {
        let content = self.content();
        let w = content.chars().count().max(1);
        self.grid.resize(w, 1);
        self.grid.write_bytes(content.as_bytes());

        let mut out = Vec::new();
        out.extend_from_slice(HOME_THEN_CLEAR.as_bytes());
        for r in 0..self.grid.height() {
            if r > 0 {
                out.extend_from_slice(b"\r\n");
            }
            let runes = self.grid.get_runes(r, 0, self.grid.width().saturating_sub(1));
            let line: String = runes.into_iter().collect();
            out.extend_from_slice(line.as_bytes());
        }
        self.pending = out;
    }
}

impl Component for Spinner {
    fn read(&mut self, buf: &mut [u8]) -> (usize, ReadStatus) {
        if self.lifecycle.is_closed() {
            return (0, ReadStatus::EndOfStream);
        }
        if self.needs_regen {
            self.regenerate();
            self.needs_regen = false;
        }
        if self.pending.is_empty() {
            // End of this frame's serialisation; the next call restarts it.
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
        let text = String::from_utf8_lossy(cmd);
        if let Some(label) = text.strip_prefix("LABEL:") {
            self.label = label.to_string();
            self.regenerate();
        } else if let Some(state) = text.strip_prefix("STATE:") {
            self.state = match state {
                "SUCCESS" => SpinnerState::Success,
                "FAILURE" => SpinnerState::Failure,
                "RUNNING" => SpinnerState::Running,
                _ => self.state, // unrecognised value: accepted, no effect
            };
            self.regenerate();
        }
        // Any other command is accepted (bytes consumed) but has no effect.
        (cmd.len(), WriteStatus::Ok)
    }

    fn close(&mut self) {
        self.lifecycle.close();
    }

    fn bind(&mut self, ctx: Context) -> Result<(), AlreadyBound> {
        self.lifecycle.bind(ctx)
    }
}
