//! Render Loop: the cooperative task set that ties a root component to a
//! Transport. Realised as OS threads plus `crossbeam_channel`, not an async
//! runtime — blocking reads and `signal-hook` flags fit a fixed-rate,
//! single-terminal render loop without pulling in an async executor.

use crate::component::Component;
use crate::error::{EngineError, EngineResult};
use crate::framebuffer::Framebuffer;
use crate::grid::Rect;
use crate::transport::{Transport, TransportControl, TransportReader};
use crossbeam_channel::{bounded, select, tick, unbounded, Receiver, Sender};
use signal_hook::consts::{SIGINT, SIGTERM, SIGWINCH};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const TICK_INTERVAL: Duration = Duration::from_millis(16);
const INPUT_CHANNEL_CAPACITY: usize = 10;
const CTRL_Q: u8 = 0x11;

enum ControlEvent {
    Quit,
    Resize,
}

/// The single cancellation signal shared by every cooperative task, bound
/// to the engine's context and propagated to every task on cancellation.
#[derive(Clone)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self { flag: Arc::new(AtomicBool::new(false)) }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

/// Strips the home+clear prefix (if present) and splits the remainder on
/// `\r\n`, returning one `String` per internal row. A component's read
/// buffer may stop mid-frame (short reads are permitted); callers should
/// accumulate until [`crate::component::ReadStatus`] signals the
/// end-of-frame boundary (an `n == 0` read) before calling this.
fn parse_frame(bytes: &[u8]) -> Vec<String> {
    const PREFIX: &str = "\x1b[H\x1b[2J";
    let text = String::from_utf8_lossy(bytes);
    let text = text.strip_prefix(PREFIX).unwrap_or(&text);
    text.split("\r\n").map(str::to_string).collect()
}

/// Reads one full frame (continuing until end of stream) from `component`,
/// accumulating into a single buffer.
fn read_full_frame(component: &mut dyn Component, scratch: &mut [u8]) -> Vec<u8> {
    let mut frame = Vec::new();
    loop {
        let (n, _) = component.read(scratch);
        if n == 0 {
            break;
        }
        frame.extend_from_slice(&scratch[..n]);
    }
    frame
}

/// Copies `root`'s current rendering into `framebuffer`'s back grid, one
/// row per line of its serialised frame.
fn blit_root_frame(root: &mut dyn Component, framebuffer: &mut Framebuffer, scratch: &mut [u8]) {
    let frame = read_full_frame(root, scratch);
    for (row, line) in parse_frame(&frame).into_iter().enumerate() {
        if row >= framebuffer.height() {
            break;
        }
        framebuffer.write(row, 0, &line);
    }
}

/// Ties a root [`Component`] to a [`Transport`], running the display
/// driver on the calling thread until a quit condition is reached.
pub struct RenderLoop {
    transport: Box<dyn Transport>,
    framebuffer: Framebuffer,
    cancellation: Cancellation,
}

impl RenderLoop {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        let (w, h) = transport.get_size();
        Self { transport, framebuffer: Framebuffer::new(w, h), cancellation: Cancellation::new() }
    }

    pub fn cancellation(&self) -> Cancellation {
        self.cancellation.clone()
    }

    /// Runs the display driver until a quit condition: input channel
    /// closed, Ctrl-Q read, interrupt/terminate signal, or cancellation.
    ///
    /// Consumes `self`: the transport is split into an owned read half,
    /// moved into the input-reader thread, and an owned write/control half,
    /// kept on this thread for the whole run. Neither half is ever shared,
    /// so a blocking read on one can't stall a write on the other.
    pub fn run(self, mut root: Box<dyn Component>) -> EngineResult<()> {
        let RenderLoop { mut transport, mut framebuffer, cancellation } = self;

        let (ctx, _close_rx) = crate::component::Context::new();
        let _ = root.bind(ctx);

        transport.set_raw_mode()?;

        let (w, h) = transport.get_size();
        framebuffer.update_terminal_size(w, h);
        if let Some(sr) = root.as_set_rect() {
            sr.set_rect(Rect::new(0, 0, w, h));
        }

        let (reader, mut control) = transport.split();

        let (input_tx, input_rx) = bounded::<char>(INPUT_CHANNEL_CAPACITY);
        let (control_tx, control_rx) = unbounded::<ControlEvent>();

        let reader_stop = Arc::new(AtomicBool::new(false));
        // Not joined: a blocking read on real stdin may not return until
        // more input arrives, so shutdown does not wait on it.
        let _reader_handle = spawn_input_reader(reader, input_tx, control_tx.clone(), reader_stop.clone());
        let signal_handle = spawn_signal_watcher(control_tx);

        let result = drive(&mut *root, &mut *control, &mut framebuffer, input_rx, control_rx, &cancellation);

        reader_stop.store(true, Ordering::SeqCst);
        if let Some(h) = signal_handle {
            h.abort();
        }

        root.close();
        let restore = control.restore_mode();
        let _ = control.write(crate::framebuffer::ansi::SHOW_CURSOR.as_bytes());
        let _ = control.write(crate::framebuffer::ansi::CLEAR_SCREEN_HOME.as_bytes());
        control.close();

        // Whichever failure happened first (the drive loop's, if any) is
        // the one callers see; teardown errors are secondary.
        result.and(restore)
    }
}

fn spawn_input_reader(
    mut reader: Box<dyn TransportReader>,
    input_tx: Sender<char>,
    control_tx: Sender<ControlEvent>,
    stop: Arc<AtomicBool>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let mut pending = Vec::with_capacity(4);
        let mut byte = [0u8; 1];
        while !stop.load(Ordering::SeqCst) {
            let n = match reader.read(&mut byte) {
                Ok(n) => n,
                Err(err) => {
                    log::warn!("input transport read failed: {err}");
                    let _ = control_tx.send(ControlEvent::Quit);
                    break;
                }
            };
            if n == 0 {
                let _ = control_tx.send(ControlEvent::Quit);
                break;
            }
            if byte[0] == CTRL_Q {
                let _ = control_tx.send(ControlEvent::Quit);
                continue;
            }
            pending.push(byte[0]);
            let Ok(text) = std::str::from_utf8(&pending) else {
                if pending.len() >= 4 {
                    pending.clear();
                }
                continue;
            };
            if let Some(rune) = text.chars().next() {
                pending.clear();
                if input_tx.try_send(rune).is_err() {
                    log::warn!("input channel full or closed, dropping rune {rune:?}");
                }
            }
        }
    })
}

fn drive(
    root: &mut dyn Component,
    control: &mut dyn TransportControl,
    framebuffer: &mut Framebuffer,
    input_rx: Receiver<char>,
    control_rx: Receiver<ControlEvent>,
    cancellation: &Cancellation,
) -> EngineResult<()> {
    let ticker = tick(TICK_INTERVAL);
    let mut scratch = vec![0u8; 64 * 1024];

    loop {
        if cancellation.is_cancelled() {
            return Ok(());
        }
        select! {
            recv(input_rx) -> msg => match msg {
                Ok(rune) => {
                    if let Some(sink) = root.as_input_sink() {
                        sink.handle_input(rune);
                    }
                }
                Err(_) => return Ok(()),
            },
            recv(control_rx) -> msg => match msg {
                Ok(ControlEvent::Quit) => return Ok(()),
                Ok(ControlEvent::Resize) => {
                    let (w, h) = control.get_size();
                    if framebuffer.update_terminal_size(w, h) {
                        if let Some(sr) = root.as_set_rect() {
                            sr.set_rect(Rect::new(0, 0, w, h));
                        }
                    }
                }
                Err(_) => return Ok(()),
            },
            recv(ticker) -> _ => {
                blit_root_frame(root, framebuffer, &mut scratch);
                let mut sink = ControlSink(control);
                framebuffer.render_to(&mut sink)?;
            }
        }
        if cancellation.is_cancelled() {
            return Ok(());
        }
    }
}

/// Adapts a `&mut dyn TransportControl` to `std::io::Write` for
/// [`Framebuffer::render_to`].
struct ControlSink<'a>(&'a mut dyn TransportControl);

impl std::io::Write for ControlSink<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.write(buf).map_err(|e| match e {
            EngineError::Transport(io_err) => io_err,
            other => std::io::Error::other(other),
        })
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

struct SignalHandle {
    stop: Arc<AtomicBool>,
    thread: std::thread::JoinHandle<()>,
}

impl SignalHandle {
    fn abort(self) {
        self.stop.store(true, Ordering::SeqCst);
        let _ = self.thread.join();
    }
}

/// Registers flag-based handlers for `SIGINT`/`SIGTERM`/`SIGWINCH` via
/// `signal_hook::flag::register` (lighter than the `iterator` API, which
/// needs its own dedicated blocking thread) and polls them on a dedicated
/// thread, translating transitions into `ControlEvent`s on the display
/// driver's control channel.
fn spawn_signal_watcher(control_tx: Sender<ControlEvent>) -> Option<SignalHandle> {
    let quit = Arc::new(AtomicBool::new(false));
    let resize = Arc::new(AtomicBool::new(false));
    for (sig, flag) in [(SIGINT, &quit), (SIGTERM, &quit), (SIGWINCH, &resize)] {
        if let Err(err) = signal_hook::flag::register(sig, Arc::clone(flag)) {
            log::warn!("failed to install handler for signal {sig}: {err}");
            return None;
        }
    }

    let stop = Arc::new(AtomicBool::new(false));
    let thread_stop = Arc::clone(&stop);
    let thread = std::thread::spawn(move || {
        while !thread_stop.load(Ordering::SeqCst) {
            if quit.swap(false, Ordering::SeqCst) && control_tx.send(ControlEvent::Quit).is_err() {
                break;
            }
            if resize.swap(false, Ordering::SeqCst) && control_tx.send(ControlEvent::Resize).is_err() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    });
    Some(SignalHandle { stop, thread })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::demo::Spinner;
    use crate::transport::StreamTransport;
    use crossbeam_channel::unbounded as channel_unbounded;
    use std::io::{Read, Write};

    #[test]
    fn parse_frame_strips_prefix_and_splits_rows() {
        let bytes = b"\x1b[H\x1b[2Jabc\r\ndef";
        let rows = parse_frame(bytes);
        assert_eq!(rows, vec!["abc".to_string(), "def".to_string()]);
    }

    #[test]
    fn parse_frame_without_prefix_still_splits() {
        let rows = parse_frame(b"one\r\ntwo\r\nthree");
        assert_eq!(rows, vec!["one", "two", "three"]);
    }

    /// One direction of an in-memory duplex pipe; `ChannelReader`/
    /// `ChannelWriter` are the two independent halves `StreamTransport`
    /// now requires.
    struct ChannelReader {
        inbound: Receiver<u8>,
    }

    impl Read for ChannelReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.inbound.recv_timeout(Duration::from_millis(200)) {
                Ok(byte) => {
                    buf[0] = byte;
                    Ok(1)
                }
                Err(_) => Ok(0),
            }
        }
    }

    struct ChannelWriter {
        outbound: Sender<u8>,
    }

    impl Write for ChannelWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            for &b in buf {
                let _ = self.outbound.send(b);
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn ctrl_q_byte_quits_the_render_loop_and_restores_the_transport() {
        let (to_engine, inbound) = channel_unbounded();
        let (outbound, from_engine) = channel_unbounded();
        let reader = ChannelReader { inbound };
        let writer = ChannelWriter { outbound };
        let transport = StreamTransport::new(reader, writer, 40, 10);
        let render_loop = RenderLoop::new(Box::new(transport));
        let root: Box<Spinner> = Box::new(Spinner::new("x"));

        let runner = std::thread::spawn(move || render_loop.run(root));

        to_engine.send(0x11u8).unwrap();

        let result = {
            let deadline = std::time::Instant::now() + Duration::from_secs(2);
            loop {
                if runner.is_finished() {
                    break runner.join().unwrap();
                }
                if std::time::Instant::now() > deadline {
                    panic!("render loop did not quit on Ctrl-Q within the deadline");
                }
                std::thread::sleep(Duration::from_millis(10));
            }
        };
        assert!(result.is_ok());

        let mut emitted = Vec::new();
        while let Ok(b) = from_engine.try_recv() {
            emitted.push(b);
        }
        let emitted_text = String::from_utf8_lossy(&emitted);
        assert!(emitted_text.contains("\x1b[?25h")); // show cursor
        assert!(emitted_text.contains("\x1b[2J")); // clear screen
    }
}
