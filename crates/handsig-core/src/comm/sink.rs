//! Line-oriented signal output
//!
//! The game side reads one `"vx vy"` line per frame from the process
//! stdout. [`SignalWriter`] keeps that format and flushes after every
//! frame so the reader never waits on a buffer.

use std::io::Write;

use crate::control::SignalOutput;
use crate::Result;

/// Writes one line per processed frame
#[derive(Debug)]
pub struct SignalWriter<W: Write> {
    writer: W,
    lines_written: u64,
}

impl<W: Write> SignalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines_written: 0,
        }
    }

    /// Write `"{vx} {vy}\n"` and flush
    pub fn write_line(&mut self, output: &SignalOutput) -> Result<()> {
        writeln!(self.writer, "{} {}", output.vx, output.vy)?;
        self.finish_line()
    }

    /// Write the whole output as one JSON object per line and flush
    pub fn write_json(&mut self, output: &SignalOutput) -> Result<()> {
        serde_json::to_writer(&mut self.writer, output)?;
        self.writer.write_all(b"\n")?;
        self.finish_line()
    }

    fn finish_line(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.lines_written += 1;
        Ok(())
    }

    #[inline]
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
