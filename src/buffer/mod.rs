//! Core buffer engine - a growable chain of recyclable blocks.
//!
//! This module implements the FIFO engine described in the crate docs:
//!
//! - [`ChainBuffer`] - chain management, block recycling, end-of-stream
//! - `write()` - append bytes, growing the chain from the pool as needed
//! - `read()` - drain bytes in order, recycling depleted blocks
//!
//! # Example
//!
//! ```
//! use chainbuf::{BufferConfig, BufferError, ChainBuffer};
//!
//! let buffer = ChainBuffer::new(BufferConfig::new().with_block_size(8));
//!
//! buffer.write(b"hello chain")?;
//! buffer.finish();
//!
//! let mut out = [0_u8; 16];
//! let n = buffer.read(&mut out)?;
//! assert_eq!(&out[..n], b"hello chain");
//! assert_eq!(buffer.read(&mut out), Err(BufferError::EndOfStream));
//! # Ok::<(), chainbuf::BufferError>(())
//! ```

pub(crate) mod pool;

use std::io;
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use bytes::{Buf, Bytes, BytesMut};

use crate::block::{Block, BlockRead, BlockWrite};
use crate::config::BufferConfig;
use crate::error::BufferError;
use crate::util::lock;
use self::pool::{BlockPool, RecyclePool};

/// A growable byte FIFO backed by a chain of fixed-size, pool-recycled
/// blocks.
///
/// A producer appends with [`write`]; bytes land in the tail block, and
/// when it fills the chain grows by one block from the recycling pool. A
/// consumer drains with [`read`]; bytes leave the head block, and once the
/// head is depleted and has a successor it is reset and returned to the
/// pool. Neither call ever blocks: a write always completes in full, a read
/// with nothing buffered returns immediately.
///
/// # Stream lifecycle
///
/// The producer declares end of input with [`finish`]. Buffered bytes stay
/// readable; once they are all drained, the next read reports
/// [`BufferError::EndOfStream`]. [`reopen`] clears the flag so the same
/// buffer can carry another logical stream.
///
/// # Concurrency
///
/// One writer thread and one reader thread may use the buffer at the same
/// time. The head and tail pointers each sit behind their own mutex and
/// every block carries its own state lock, so the two sides proceed in
/// parallel except when both touch a shared boundary block. Extra writers
/// or readers are not unsafe - they serialize on the pointer mutexes - but
/// the crate is designed and tested for the one-in/one-out arrangement.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chainbuf::ChainBuffer;
///
/// let buffer = Arc::new(ChainBuffer::default());
/// let writer = Arc::clone(&buffer);
///
/// let handle = std::thread::spawn(move || {
///     writer.write(b"from the producer").unwrap();
///     writer.finish();
/// });
///
/// handle.join().unwrap();
/// let mut out = vec![0_u8; 32];
/// let n = buffer.read(&mut out).unwrap();
/// assert_eq!(&out[..n], b"from the producer");
/// ```
///
/// [`write`]: ChainBuffer::write
/// [`read`]: ChainBuffer::read
/// [`finish`]: ChainBuffer::finish
/// [`reopen`]: ChainBuffer::reopen
pub struct ChainBuffer {
    /// Oldest block, currently being drained. Lock order: head before tail.
    head: Mutex<Arc<Block>>,

    /// Newest block, currently accepting writes.
    tail: Mutex<Arc<Block>>,

    pool: Arc<dyn BlockPool>,
    closed: AtomicBool,
    block_size: usize,
    signal_empty_reads: bool,
}

impl ChainBuffer {
    /// Creates a buffer from a resolved configuration, seeded with one
    /// empty block.
    pub fn new(config: BufferConfig) -> Self {
        let block_size = config.block_size();
        let pool: Arc<dyn BlockPool> = match config.pool() {
            Some(pool) => Arc::clone(pool),
            None => Arc::new(RecyclePool::new()),
        };

        let initial = pool.acquire(block_size);
        Self {
            head: Mutex::new(Arc::clone(&initial)),
            tail: Mutex::new(initial),
            pool,
            closed: AtomicBool::new(false),
            block_size,
            signal_empty_reads: config.signals_empty_reads(),
        }
    }

    /// Returns the fixed capacity of each block in the chain.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Appends all of `src`, growing the chain as blocks fill.
    ///
    /// Returns the number of bytes written, which is always `src.len()` on
    /// success. Fails with [`BufferError::StreamClosed`] (and writes
    /// nothing) once [`finish`] was called and until [`reopen`] clears it.
    ///
    /// [`finish`]: ChainBuffer::finish
    /// [`reopen`]: ChainBuffer::reopen
    pub fn write(&self, src: &[u8]) -> Result<usize, BufferError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(BufferError::StreamClosed);
        }

        let mut tail = lock(&self.tail);
        let mut total = 0;
        while total < src.len() {
            match tail.write_from(&src[total..]) {
                BlockWrite::Data(n) => total += n,
                BlockWrite::Full => {
                    let fresh = self.pool.acquire(self.block_size);
                    tail.link_next(Arc::clone(&fresh));
                    *tail = fresh;
                }
            }
        }
        Ok(total)
    }

    /// Drains up to `dst.len()` buffered bytes into `dst`, in write order.
    ///
    /// Depleted blocks passed along the way are detached, reset and
    /// returned to the pool. The tail block is never recycled, even when
    /// fully read: the writer may still be filling it.
    ///
    /// A call that moves zero bytes returns `Ok(0)` (or
    /// [`BufferError::Empty`] when configured) while the stream is open,
    /// and [`BufferError::EndOfStream`] once the stream is finished and
    /// fully drained.
    pub fn read(&self, dst: &mut [u8]) -> Result<usize, BufferError> {
        if dst.is_empty() {
            return Ok(0);
        }

        // Sampled before draining: if the producer had already finished,
        // every write it made is visible here, so finding nothing below
        // really does mean end of stream. A finish that lands mid-read is
        // reported by the next call.
        let closed = self.closed.load(Ordering::Acquire);

        let mut head = lock(&self.head);
        let mut total = 0;
        while total < dst.len() {
            match head.read_into(&mut dst[total..]) {
                BlockRead::Data(n) => total += n,
                BlockRead::Depleted => match head.take_next() {
                    Some(next) => {
                        let drained = mem::replace(&mut *head, next);
                        self.pool.release(drained);
                    }
                    // No successor: this block is the tail, still filling.
                    None => break,
                },
                BlockRead::Exhausted => break,
            }
        }

        if total == 0 {
            // Both break paths leave head == tail: an exhausted block is
            // not full and only full blocks grow successors.
            if closed {
                return Err(BufferError::EndOfStream);
            }
            if self.signal_empty_reads {
                return Err(BufferError::Empty);
            }
        }
        Ok(total)
    }

    /// Drains all remaining bytes of `src` into the buffer.
    ///
    /// Equivalent to repeated [`write`] calls over `src`'s chunks; returns
    /// the total number of bytes consumed.
    ///
    /// [`write`]: ChainBuffer::write
    pub fn write_buf<B: Buf>(&self, src: &mut B) -> Result<usize, BufferError> {
        let mut total = 0;
        while src.has_remaining() {
            let n = self.write(src.chunk())?;
            src.advance(n);
            total += n;
        }
        Ok(total)
    }

    /// Drains up to `max` buffered bytes into a freshly allocated
    /// [`Bytes`], with the same empty and end-of-stream reporting as
    /// [`read`].
    ///
    /// [`read`]: ChainBuffer::read
    pub fn read_bytes(&self, max: usize) -> Result<Bytes, BufferError> {
        let mut buf = BytesMut::zeroed(max);
        let n = self.read(&mut buf)?;
        buf.truncate(n);
        Ok(buf.freeze())
    }

    /// Declares that no further input will be written.
    ///
    /// Buffered bytes remain readable; only a fully drained buffer reports
    /// [`BufferError::EndOfStream`]. Calling this while unread bytes remain
    /// is legal and common.
    pub fn finish(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Clears the end-of-input flag, permitting a fresh stream of writes
    /// on the same buffer.
    pub fn reopen(&self) {
        self.closed.store(false, Ordering::Release);
    }

    /// True once [`finish`] was called and [`reopen`] has not been.
    ///
    /// [`finish`]: ChainBuffer::finish
    /// [`reopen`]: ChainBuffer::reopen
    pub fn is_finished(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// True iff no unread bytes are buffered anywhere in the chain.
    pub fn is_empty(&self) -> bool {
        let head = lock(&self.head);
        let tail = lock(&self.tail);
        // Every non-tail block holds unread bytes or is pending recycle,
        // so a single exhausted block means the whole chain is drained.
        Arc::ptr_eq(&head, &tail) && head.is_exhausted()
    }
}

impl Default for ChainBuffer {
    fn default() -> Self {
        Self::new(BufferConfig::default())
    }
}

impl std::fmt::Debug for ChainBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainBuffer")
            .field("block_size", &self.block_size)
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .field("empty", &self.is_empty())
            .finish()
    }
}

/// Producer-side adapter: `StreamClosed` maps to `BrokenPipe`.
///
/// Bind a reference first (`let mut w = &buffer;`) or call through the
/// trait; the inherent `write` shadows this impl on a bare receiver.
impl io::Write for &ChainBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        ChainBuffer::write(self, buf).map_err(|e| io::Error::new(io::ErrorKind::BrokenPipe, e))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Consumer-side adapter following the non-blocking reader convention:
/// data yields `Ok(n)`, "nothing yet" yields `WouldBlock`, and end of
/// stream yields the conventional `Ok(0)` EOF.
impl io::Read for &ChainBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match ChainBuffer::read(self, buf) {
            Ok(0) if !buf.is_empty() => Err(io::ErrorKind::WouldBlock.into()),
            Ok(n) => Ok(n),
            Err(BufferError::EndOfStream) => Ok(0),
            Err(BufferError::Empty) => Err(io::ErrorKind::WouldBlock.into()),
            Err(e) => Err(io::Error::other(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> ChainBuffer {
        ChainBuffer::new(BufferConfig::new().with_block_size(8))
    }

    #[test]
    fn test_write_then_read_within_one_block() {
        let buffer = small();
        assert_eq!(buffer.write(b"abc"), Ok(3));

        let mut out = [0_u8; 8];
        assert_eq!(buffer.read(&mut out), Ok(3));
        assert_eq!(&out[..3], b"abc");
    }

    #[test]
    fn test_write_spans_blocks() {
        let buffer = small();
        let data: Vec<u8> = (0..40).collect();
        assert_eq!(buffer.write(&data), Ok(40));

        let mut out = vec![0_u8; 64];
        assert_eq!(buffer.read(&mut out), Ok(40));
        assert_eq!(&out[..40], &data[..]);
    }

    #[test]
    fn test_empty_read_is_ok_zero_by_default() {
        let buffer = small();
        let mut out = [0_u8; 4];
        assert_eq!(buffer.read(&mut out), Ok(0));
    }

    #[test]
    fn test_empty_read_signals_when_configured() {
        let buffer = ChainBuffer::new(
            BufferConfig::new()
                .with_block_size(8)
                .signal_empty_reads(true),
        );
        let mut out = [0_u8; 4];
        assert_eq!(buffer.read(&mut out), Err(BufferError::Empty));

        // Not conflated with end of stream.
        buffer.finish();
        assert_eq!(buffer.read(&mut out), Err(BufferError::EndOfStream));
    }

    #[test]
    fn test_zero_length_destination() {
        let buffer = small();
        buffer.write(b"data").unwrap();
        assert_eq!(buffer.read(&mut []), Ok(0));
        assert!(!buffer.is_empty());
    }

    #[test]
    fn test_write_after_finish_is_rejected() {
        let buffer = small();
        buffer.finish();
        assert_eq!(buffer.write(b"late"), Err(BufferError::StreamClosed));
        assert!(buffer.is_finished());

        buffer.reopen();
        assert_eq!(buffer.write(b"ok"), Ok(2));
    }

    #[test]
    fn test_end_of_stream_only_after_drain() {
        let buffer = small();
        buffer.write(b"abcdef").unwrap();
        buffer.finish();

        let mut out = [0_u8; 4];
        assert_eq!(buffer.read(&mut out), Ok(4));
        assert_eq!(buffer.read(&mut out), Ok(2));
        assert_eq!(buffer.read(&mut out), Err(BufferError::EndOfStream));
    }

    #[test]
    fn test_is_empty_tracks_buffered_bytes() {
        let buffer = small();
        assert!(buffer.is_empty());

        buffer.write(b"x").unwrap();
        assert!(!buffer.is_empty());

        let mut out = [0_u8; 1];
        buffer.read(&mut out).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_reopen_supports_second_stream() {
        let buffer = small();
        let mut out = [0_u8; 32];

        buffer.write(b"first").unwrap();
        buffer.finish();
        assert_eq!(buffer.read(&mut out), Ok(5));
        assert_eq!(buffer.read(&mut out), Err(BufferError::EndOfStream));

        buffer.reopen();
        buffer.write(b"second").unwrap();
        buffer.finish();
        assert_eq!(buffer.read(&mut out), Ok(6));
        assert_eq!(&out[..6], b"second");
        assert_eq!(buffer.read(&mut out), Err(BufferError::EndOfStream));
    }

    #[test]
    fn test_blocks_are_recycled_through_pool() {
        let pool = Arc::new(RecyclePool::new());
        let buffer = ChainBuffer::new(
            BufferConfig::new()
                .with_block_size(8)
                .with_pool(Arc::clone(&pool) as Arc<dyn BlockPool>),
        );

        // Three blocks' worth; draining should recycle the two it passes.
        buffer.write(&[7_u8; 24]).unwrap();
        let mut out = vec![0_u8; 24];
        assert_eq!(buffer.read(&mut out), Ok(24));
        assert_eq!(pool.free_blocks(), 2);

        // The next growth pulls from the pool instead of allocating.
        buffer.write(&[9_u8; 16]).unwrap();
        assert_eq!(pool.free_blocks(), 0);
    }

    #[test]
    fn test_write_buf_drains_source() {
        let buffer = small();
        let mut src = Bytes::from_static(b"buffered input");
        assert_eq!(buffer.write_buf(&mut src), Ok(14));
        assert!(!src.has_remaining());

        let mut out = vec![0_u8; 32];
        assert_eq!(buffer.read(&mut out), Ok(14));
        assert_eq!(&out[..14], b"buffered input");
    }

    #[test]
    fn test_read_bytes() {
        let buffer = small();
        buffer.write(b"hello").unwrap();

        let bytes = buffer.read_bytes(3).unwrap();
        assert_eq!(&bytes[..], b"hel");
        let bytes = buffer.read_bytes(16).unwrap();
        assert_eq!(&bytes[..], b"lo");

        buffer.finish();
        assert_eq!(buffer.read_bytes(16), Err(BufferError::EndOfStream));
    }

    #[test]
    fn test_io_adapters() {
        use std::io::{Read, Write};

        // The inherent read/write methods shadow the trait impls on a bare
        // receiver, so the adapters are exercised through trait calls.
        let buffer = small();
        let mut writer = &buffer;
        let mut reader = &buffer;

        Write::write_all(&mut writer, b"piped").unwrap();

        let mut out = [0_u8; 8];
        assert_eq!(Read::read(&mut reader, &mut out).unwrap(), 5);

        // Nothing buffered, stream open: WouldBlock, not EOF.
        let err = Read::read(&mut reader, &mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);

        // Finished and drained: conventional EOF.
        buffer.finish();
        assert_eq!(Read::read(&mut reader, &mut out).unwrap(), 0);

        let err = Write::write(&mut writer, b"late").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
