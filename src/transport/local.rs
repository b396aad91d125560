//! Local transport: standard input/output, real raw mode, real kernel
//! window-size queries, built on `crossterm`'s terminal-mode and size APIs.

use super::{Transport, TransportControl, TransportReader};
use crate::error::{EngineError, EngineResult};
use std::io::{Read, Stdin, Stdout, Write};

pub struct LocalTransport {
    stdin: Stdin,
    stdout: Stdout,
    raw_mode_active: bool,
}

impl LocalTransport {
    pub fn new() -> Self {
        Self { stdin: std::io::stdin(), stdout: std::io::stdout(), raw_mode_active: false }
    }
}

impl Default for LocalTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for LocalTransport {
    fn read(&mut self, buf: &mut [u8]) -> EngineResult<usize> {
        self.stdin.read(buf).map_err(EngineError::Transport)
    }

    fn write(&mut self, buf: &[u8]) -> EngineResult<usize> {
        let n = self.stdout.write(buf).map_err(EngineError::Transport)?;
        self.stdout.flush().map_err(EngineError::Transport)?;
        Ok(n)
    }

    fn close(&mut self) {
        let _ = self.restore_mode();
    }

    fn get_size(&self) -> (usize, usize) {
        crossterm::terminal::size()
            .map(|(w, h)| (w as usize, h as usize))
            .unwrap_or((crate::framebuffer::MIN_WIDTH, crate::framebuffer::MIN_HEIGHT))
    }

    fn set_raw_mode(&mut self) -> EngineResult<()> {
        crossterm::terminal::enable_raw_mode().map_err(EngineError::RawMode)?;
        self.raw_mode_active = true;
        Ok(())
    }

    fn restore_mode(&mut self) -> EngineResult<()> {
        if !self.raw_mode_active {
            return Ok(());
        }
        crossterm::terminal::disable_raw_mode().map_err(EngineError::RawMode)?;
        self.raw_mode_active = false;
        Ok(())
    }

    fn split(self: Box<Self>) -> (Box<dyn TransportReader>, Box<dyn TransportControl>) {
        (
            Box::new(LocalReader { stdin: self.stdin }),
            Box::new(LocalControl { stdout: self.stdout, raw_mode_active: self.raw_mode_active }),
        )
    }
}

/// Owns stdin exclusively once split off — independent of stdout, so its
/// blocking reads never need to coordinate with writes on the other half.
struct LocalReader {
    stdin: Stdin,
}

impl TransportReader for LocalReader {
    fn read(&mut self, buf: &mut [u8]) -> EngineResult<usize> {
        self.stdin.read(buf).map_err(EngineError::Transport)
    }
}

struct LocalControl {
    stdout: Stdout,
    raw_mode_active: bool,
}

impl TransportControl for LocalControl {
    fn write(&mut self, buf: &[u8]) -> EngineResult<usize> {
        let n = self.stdout.write(buf).map_err(EngineError::Transport)?;
        self.stdout.flush().map_err(EngineError::Transport)?;
        Ok(n)
    }

    fn close(&mut self) {
        let _ = self.restore_mode();
    }

    fn get_size(&self) -> (usize, usize) {
        crossterm::terminal::size()
            .map(|(w, h)| (w as usize, h as usize))
            .unwrap_or((crate::framebuffer::MIN_WIDTH, crate::framebuffer::MIN_HEIGHT))
    }

    fn set_raw_mode(&mut self) -> EngineResult<()> {
        crossterm::terminal::enable_raw_mode().map_err(EngineError::RawMode)?;
        self.raw_mode_active = true;
        Ok(())
    }

    fn restore_mode(&mut self) -> EngineResult<()> {
        if !self.raw_mode_active {
            return Ok(());
        }
        crossterm::terminal::disable_raw_mode().map_err(EngineError::RawMode)?;
        self.raw_mode_active = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_mode_without_set_is_noop() {
        let mut t = LocalTransport::new();
        assert!(t.restore_mode().is_ok());
    }
}
