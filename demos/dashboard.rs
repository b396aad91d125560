//! Dashboard Example - three spinners tiled by a Grid Layout
//!
//! Demonstrates wiring a root `GridLayout` of `Spinner` components to a
//! real terminal via `LocalTransport` and running the render loop until
//! Ctrl-Q or an interrupt signal.
//!
//! Run with: cargo run --example dashboard

use tui_loom::component::demo::Spinner;
use tui_loom::{GridLayout, LocalTransport, RenderLoop};

fn main() -> anyhow::Result<()> {
    let root = GridLayout::new(
        1,
        3,
        1,
        vec![
            Box::new(Spinner::new("build")),
            Box::new(Spinner::new("test")),
            Box::new(Spinner::new("deploy")),
        ],
    );

    let transport = LocalTransport::new();
    let render_loop = RenderLoop::new(Box::new(transport));
    render_loop.run(Box::new(root))?;
    Ok(())
}
