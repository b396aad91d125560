//! Component Contract: the read/write/close capability every UI node must
//! satisfy, plus the optional input sink and the one-shot context binding.
//!
//! Modeled as a flat capability trait rather than an inheritance tree:
//! `Component` plus an optional `InputSink` accessor avoids a deep
//! supertrait hierarchy for what is really a handful of independent
//! capabilities a node may or may not have.

pub mod demo;

use crate::grid::Rect;
use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Outcome of a [`Component::read`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    Ok,
    EndOfStream,
}

/// Outcome of a [`Component::write`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Ok,
    EndOfStream,
}

/// A cancellation signal bound once to a component's lifetime.
#[derive(Clone)]
pub struct Context {
    cancelled: Arc<AtomicBool>,
    closer: Sender<()>,
}

impl Context {
    pub fn new() -> (Self, Receiver<()>) {
        let (closer, rx) = crossbeam_channel::bounded(1);
        (Self { cancelled: Arc::new(AtomicBool::new(false)), closer }, rx)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        let _ = self.closer.try_send(());
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Returned by [`Component::bind`] when a context has already been bound.
/// Binding is one-shot; this crate always rejects a second bind rather
/// than silently ignoring it, so behavior is uniform across components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("component is already bound to a context")]
pub struct AlreadyBound;

/// Minimal capability for nodes that occupy a rectangle of the grid —
/// implemented by every [`crate::layout`] node. Kept separate from
/// [`Component`] (rather than a `Layout: Component` supertrait) so a layout
/// can be discovered behind a `Box<dyn Component>` child slot without the
/// container needing to know the concrete child type.
pub trait SetRect {
    fn set_rect(&mut self, rect: Rect);
}

/// The capability every UI node must satisfy.
pub trait Component: Send {
    /// Serializes the component's current view into `buf`. Idempotent
    /// across calls only if no command has been written since the last
    /// full read.
    fn read(&mut self, buf: &mut [u8]) -> (usize, ReadStatus);

    /// Accepts a command byte sequence. An unrecognised command is
    /// accepted (bytes consumed) but has no effect.
    fn write(&mut self, cmd: &[u8]) -> (usize, WriteStatus);

    /// Transitions to the terminal state. Idempotent: a second call is a
    /// no-op, and subsequent reads/writes report [`ReadStatus::EndOfStream`]
    /// / [`WriteStatus::EndOfStream`].
    fn close(&mut self);

    /// Binds the component's cancellation context. One-shot; a second
    /// call returns `Err(AlreadyBound)` rather than silently ignoring it.
    fn bind(&mut self, ctx: Context) -> Result<(), AlreadyBound>;

    /// Capability discovery for keyboard routing. Components that don't
    /// accept input return `None`.
    fn as_input_sink(&mut self) -> Option<&mut dyn InputSink> {
        None
    }

    /// Capability discovery for layout containers: `None` for leaf
    /// components, `Some(self)` for anything implementing [`SetRect`].
    fn as_set_rect(&mut self) -> Option<&mut dyn SetRect> {
        None
    }
}

/// Optional capability: components that accept single-rune key events.
pub trait InputSink {
    fn handle_input(&mut self, rune: char);
}

/// Shared bookkeeping every concrete component embeds: terminal-state
/// tracking plus the one-shot context, following the
/// `initialized -> running -> {cancelled, closed}` lifecycle every engine
/// entity goes through.
pub struct Lifecycle {
    closed: bool,
    ctx: Option<Context>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self { closed: false, ctx: None }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn bind(&mut self, ctx: Context) -> Result<(), AlreadyBound> {
        if self.ctx.is_some() {
            return Err(AlreadyBound);
        }
        self.ctx = Some(ctx);
        Ok(())
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_close_is_idempotent() {
        let mut lc = Lifecycle::new();
        assert!(!lc.is_closed());
        lc.close();
        lc.close();
        assert!(lc.is_closed());
    }

    #[test]
    fn rebinding_is_rejected() {
        let mut lc = Lifecycle::new();
        let (ctx1, _rx1) = Context::new();
        let (ctx2, _rx2) = Context::new();
        assert!(lc.bind(ctx1).is_ok());
        assert_eq!(lc.bind(ctx2), Err(AlreadyBound));
    }

    #[test]
    fn context_cancel_is_observable() {
        let (ctx, rx) = Context::new();
        assert!(!ctx.is_cancelled());
        ctx.cancel();
        assert!(ctx.is_cancelled());
        assert!(rx.try_recv().is_ok());
    }
}
