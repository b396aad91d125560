//! # tui-loom
//!
//! A rune-grid terminal UI engine: components render into a pool-backed
//! Cell Grid, a rune-level diff kernel reduces two grids to a minimal set
//! of dirty rectangles, and a Framebuffer turns those rectangles into the
//! small ANSI vocabulary this crate emits. A cooperative Render Loop ties
//! a tree of components to a Transport — a real terminal, or any
//! `Read + Write` stream — fanning input, resize, and a 16ms tick into
//! per-component renders.
//!
//! ## Modules
//!
//! - [`grid`] — the Cell Grid and its pool (`grid::pool`)
//! - [`diff`] — the rune-level diff kernel, scalar and SIMD
//! - [`framebuffer`] — front/back grids, cursor, the ANSI serialiser
//! - [`component`] — the `Component` contract components implement
//! - [`layout`] — Grid/Stack/Border layouts that partition a rect among children
//! - [`transport`] — the byte channel between the engine and a terminal or stream
//! - [`runtime`] — the render loop tying a root component to a transport
//! - [`error`] — the engine's error taxonomy

pub mod component;
pub mod diff;
pub mod error;
pub mod framebuffer;
pub mod grid;
pub mod layout;
pub mod runtime;
pub mod transport;

pub use component::{AlreadyBound, Component, Context, InputSink, Lifecycle, ReadStatus, SetRect, WriteStatus};
pub use diff::DiffRun;
pub use error::{EngineError, EngineResult};
pub use framebuffer::Framebuffer;
pub use grid::{CellGrid, DirtyRegion, GridPool, Rect};
pub use layout::{BorderLayout, BorderSlot, GridLayout, StackDirection, StackLayout};
pub use runtime::{Cancellation, RenderLoop};
pub use transport::{LocalTransport, StreamTransport, Transport, TransportControl, TransportReader};
