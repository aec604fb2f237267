//! Push-based consumers for response bodies.
//!
//! `pipe_to` forwards body fragments to a [`StreamSink`] as they arrive
//! instead of buffering the whole body on the response.

use std::io;

/// A writable target for a piped response body.
///
/// `accept_chunk` is invoked once per received fragment; `finish` exactly
/// once after the last fragment. Errors from either abort the pipe and
/// surface to the caller as [`Error::Sink`].
///
/// [`Error::Sink`]: crate::Error::Sink
pub trait StreamSink {
    /// Consumes one body fragment. The boolean mirrors the write-side
    /// backpressure convention: `false` means "accepted, but slow down".
    fn accept_chunk(&mut self, chunk: &[u8]) -> io::Result<bool>;

    /// Signals the end of the body stream.
    fn finish(&mut self) -> io::Result<()>;
}

impl StreamSink for Vec<u8> {
    fn accept_chunk(&mut self, chunk: &[u8]) -> io::Result<bool> {
        self.extend_from_slice(chunk);
        Ok(true)
    }

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Adapts any [`std::io::Write`] into a [`StreamSink`].
pub struct WriterSink<W: io::Write> {
    writer: W,
}

impl<W: io::Write> WriterSink<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> StreamSink for WriterSink<W> {
    fn accept_chunk(&mut self, chunk: &[u8]) -> io::Result<bool> {
        self.writer.write_all(chunk)?;
        Ok(true)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
