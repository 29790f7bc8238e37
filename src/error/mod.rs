//! Error types for chainbuf.

use std::fmt;

/// Errors that can occur while writing to or reading from a [`ChainBuffer`].
///
/// Block-level conditions (full, exhausted, depleted) are consumed inside the
/// buffer's own read/write loops and never appear here.
///
/// [`ChainBuffer`]: crate::ChainBuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// A write was attempted after [`finish`] and before [`reopen`].
    ///
    /// [`finish`]: crate::ChainBuffer::finish
    /// [`reopen`]: crate::ChainBuffer::reopen
    StreamClosed,

    /// The stream was finished and every buffered byte has been drained.
    ///
    /// Terminal for the logical stream until [`reopen`] is called.
    ///
    /// [`reopen`]: crate::ChainBuffer::reopen
    EndOfStream,

    /// Nothing is buffered right now; try again later.
    ///
    /// Only returned when the buffer was configured with
    /// [`signal_empty_reads`]; the default outcome for an empty read is
    /// `Ok(0)`.
    ///
    /// [`signal_empty_reads`]: crate::BufferConfig::signal_empty_reads
    Empty,
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::StreamClosed => write!(f, "input stream finished"),
            BufferError::EndOfStream => write!(f, "end of stream"),
            BufferError::Empty => write!(f, "buffer empty"),
        }
    }
}

impl std::error::Error for BufferError {}
