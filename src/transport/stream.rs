//! Stream transport: wraps any `Read + Write` pair with a fixed size and
//! no-op raw-mode hooks — used by this crate's own tests and for embedding
//! the engine over a pipe instead of a real tty.

use super::{Transport, TransportControl, TransportReader};
use crate::error::{EngineError, EngineResult};
use std::io::{Read, Write};

/// Wraps an independent reader and writer rather than one combined stream,
/// so [`split`](Transport::split) can hand each half to a different thread
/// without requiring the stream itself to support splitting.
pub struct StreamTransport<R, W> {
    reader: R,
    writer: W,
    width: usize,
    height: usize,
}

impl<R: Read + Send, W: Write + Send> StreamTransport<R, W> {
    pub fn new(reader: R, writer: W, width: usize, height: usize) -> Self {
        Self { reader, writer, width, height }
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }
}

impl<R: Read + Send + 'static, W: Write + Send + 'static> Transport for StreamTransport<R, W> {
    fn read(&mut self, buf: &mut [u8]) -> EngineResult<usize> {
        self.reader.read(buf).map_err(EngineError::Transport)
    }

    fn write(&mut self, buf: &[u8]) -> EngineResult<usize> {
        let n = self.writer.write(buf).map_err(EngineError::Transport)?;
        self.writer.flush().map_err(EngineError::Transport)?;
        Ok(n)
    }

    fn close(&mut self) {}

    fn get_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn set_raw_mode(&mut self) -> EngineResult<()> {
        Ok(())
    }

    fn restore_mode(&mut self) -> EngineResult<()> {
        Ok(())
    }

    fn split(self: Box<Self>) -> (Box<dyn TransportReader>, Box<dyn TransportControl>) {
        (
            Box::new(StreamReader { reader: self.reader }),
            Box::new(StreamControl { writer: self.writer, width: self.width, height: self.height }),
        )
    }
}

struct StreamReader<R> {
    reader: R,
}

impl<R: Read + Send> TransportReader for StreamReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> EngineResult<usize> {
        self.reader.read(buf).map_err(EngineError::Transport)
    }
}

struct StreamControl<W> {
    writer: W,
    width: usize,
    height: usize,
}

impl<W: Write + Send> TransportControl for StreamControl<W> {
    fn write(&mut self, buf: &[u8]) -> EngineResult<usize> {
        let n = self.writer.write(buf).map_err(EngineError::Transport)?;
        self.writer.flush().map_err(EngineError::Transport)?;
        Ok(n)
    }

    fn close(&mut self) {}

    fn get_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn set_raw_mode(&mut self) -> EngineResult<()> {
        Ok(())
    }

    fn restore_mode(&mut self) -> EngineResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_and_write_pass_through() {
        let mut t = StreamTransport::new(Cursor::new(Vec::<u8>::new()), Cursor::new(Vec::<u8>::new()), 80, 24);
        assert_eq!(t.write(b"hello").unwrap(), 5);
        assert_eq!(t.get_size(), (80, 24));
    }

    #[test]
    fn raw_mode_hooks_are_noops() {
        let mut t = StreamTransport::new(Cursor::new(Vec::<u8>::new()), Cursor::new(Vec::<u8>::new()), 80, 24);
        assert!(t.set_raw_mode().is_ok());
        assert!(t.restore_mode().is_ok());
    }

    #[test]
    fn set_size_updates_get_size() {
        let mut t = StreamTransport::new(Cursor::new(Vec::<u8>::new()), Cursor::new(Vec::<u8>::new()), 80, 24);
        t.set_size(100, 40);
        assert_eq!(t.get_size(), (100, 40));
    }
}
