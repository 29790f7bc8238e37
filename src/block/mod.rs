//! Fixed-capacity byte blocks - the links of the buffer chain.
//!
//! A [`Block`] is a fixed-size byte segment with two monotonically advancing
//! cursors: `written` counts bytes committed into the block, `read` counts
//! bytes consumed from it. Blocks are linked forward-only into a chain by the
//! buffer and recycled through a pool once fully drained.
//!
//! Cursor state lives behind the block's own mutex, so one writer advancing
//! `written` and one reader advancing `read` can touch the *same* block
//! concurrently. This lock covers only the block itself, never the buffer's
//! chain pointers.

use std::sync::{Arc, Mutex};

use crate::util::lock;

/// Outcome of a single block-level read attempt.
///
/// These are flow-control signals for the buffer's read loop, not errors;
/// callers of the public API never see them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockRead {
    /// Copied this many bytes out of the block.
    Data(usize),
    /// No unread bytes right now, but the block is not full: more may still
    /// be written into it. Wait, don't discard.
    Exhausted,
    /// Every byte of the block's capacity has been written and read. The
    /// block will never yield another byte; safe to recycle.
    Depleted,
}

/// Outcome of a single block-level write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockWrite {
    /// Copied this many bytes into the block.
    Data(usize),
    /// The block's capacity is fully written; the chain must grow.
    Full,
}

/// Cursor state and storage, guarded by the block mutex.
#[derive(Debug)]
struct BlockState {
    data: Box<[u8]>,
    written: usize,
    read: usize,
    next: Option<Arc<Block>>,
}

/// A fixed-capacity byte segment with independent write and read cursors.
///
/// Blocks from one buffer all share a single capacity, fixed at creation.
/// A block is never destroyed in normal operation; it cycles between "in
/// chain" and "in pool" indefinitely.
///
/// Invariants: `0 <= read <= written <= capacity`. The block is *full* once
/// `written == capacity`, *exhausted* once `read == written`, and *depleted*
/// (eligible for recycling) once `read == capacity`.
#[derive(Debug)]
pub struct Block {
    capacity: usize,
    state: Mutex<BlockState>,
}

impl Block {
    /// Creates an empty block with the given fixed capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(BlockState {
                data: vec![0; capacity].into_boxed_slice(),
                written: 0,
                read: 0,
                next: None,
            }),
        }
    }

    /// Returns the block's fixed capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Zeroes both cursors and clears the successor link, preparing the
    /// block for pool reuse.
    ///
    /// Must only be called once the block is depleted and detached from the
    /// chain; resetting a linked block would orphan its successors.
    pub fn reset(&self) {
        let mut state = lock(&self.state);
        state.written = 0;
        state.read = 0;
        state.next = None;
    }

    /// Copies up to `dst.len()` unread bytes into `dst` and advances the
    /// read cursor by the number copied.
    pub(crate) fn read_into(&self, dst: &mut [u8]) -> BlockRead {
        let mut state = lock(&self.state);
        if state.read == self.capacity {
            return BlockRead::Depleted;
        }
        let unread = state.written - state.read;
        if unread == 0 {
            return BlockRead::Exhausted;
        }
        let n = unread.min(dst.len());
        let start = state.read;
        dst[..n].copy_from_slice(&state.data[start..start + n]);
        state.read += n;
        BlockRead::Data(n)
    }

    /// Copies up to `capacity - written` bytes from `src` and advances the
    /// write cursor by the number copied.
    pub(crate) fn write_from(&self, src: &[u8]) -> BlockWrite {
        let mut state = lock(&self.state);
        let free = self.capacity - state.written;
        if free == 0 {
            return BlockWrite::Full;
        }
        let n = free.min(src.len());
        let start = state.written;
        state.data[start..start + n].copy_from_slice(&src[..n]);
        state.written += n;
        BlockWrite::Data(n)
    }

    /// Links `next` as this block's successor.
    ///
    /// Only the writer calls this, and only on the current tail after it
    /// filled; a block's successor is set at most once between resets.
    pub(crate) fn link_next(&self, next: Arc<Block>) {
        lock(&self.state).next = Some(next);
    }

    /// Detaches and returns this block's successor, if one was linked.
    pub(crate) fn take_next(&self) -> Option<Arc<Block>> {
        lock(&self.state).next.take()
    }

    /// True when every written byte has also been read.
    pub(crate) fn is_exhausted(&self) -> bool {
        let state = lock(&self.state);
        state.read == state.written
    }
}
