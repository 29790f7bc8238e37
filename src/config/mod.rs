//! Configuration for buffer behavior.
//!
//! [`BufferConfig`] is resolved once at construction into the settings a
//! [`ChainBuffer`] runs with: the fixed block size, the recycling pool, and
//! how a read that finds nothing buffered reports itself.
//!
//! # Example
//!
//! ```
//! use chainbuf::BufferConfig;
//!
//! // Smaller blocks, and treat "nothing yet" as an error instead of Ok(0)
//! let config = BufferConfig::new()
//!     .with_block_size(512)
//!     .signal_empty_reads(true);
//! assert_eq!(config.block_size(), 512);
//! ```
//!
//! [`ChainBuffer`]: crate::ChainBuffer

use std::fmt;
use std::sync::Arc;

use crate::buffer::pool::BlockPool;

/// Default capacity of a single block (4 KiB).
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Configuration for a [`ChainBuffer`].
///
/// Resolution order: an explicitly set option wins; anything left unset (or
/// a block size of zero) falls back to its default. There is nothing to
/// validate - every resolvable combination is legal.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chainbuf::{BufferConfig, RecyclePool};
///
/// // Share one pool between two buffers
/// let pool = Arc::new(RecyclePool::new());
/// let config = BufferConfig::new().with_pool(pool.clone());
/// ```
///
/// [`ChainBuffer`]: crate::ChainBuffer
#[derive(Clone, Default)]
pub struct BufferConfig {
    /// Requested block size; zero means "use the default".
    block_size: usize,

    /// Caller-owned recycling pool, if any.
    pool: Option<Arc<dyn BlockPool>>,

    /// Whether empty reads yield `Err(Empty)` instead of `Ok(0)`.
    signal_empty_reads: bool,
}

impl BufferConfig {
    /// Creates a configuration with all defaults: 4 KiB blocks, an
    /// internally managed pool, and `Ok(0)` empty reads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the capacity of each block in bytes.
    ///
    /// Zero is treated as unset and resolves to [`DEFAULT_BLOCK_SIZE`].
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Supplies an externally owned recycling pool.
    ///
    /// Useful for sharing one free list across several buffers. When unset,
    /// each buffer creates its own [`RecyclePool`].
    ///
    /// [`RecyclePool`]: crate::RecyclePool
    pub fn with_pool(mut self, pool: Arc<dyn BlockPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Chooses how a read that moves zero bytes reports itself.
    ///
    /// By default such a read returns `Ok(0)` - the steady-state "nothing
    /// available yet, try again later" outcome. With `true`, it returns
    /// [`BufferError::Empty`] instead, for callers that prefer to branch on
    /// an error. End-of-stream reporting is unaffected either way.
    ///
    /// [`BufferError::Empty`]: crate::BufferError::Empty
    pub fn signal_empty_reads(mut self, signal: bool) -> Self {
        self.signal_empty_reads = signal;
        self
    }

    /// Returns the resolved block size in bytes.
    pub fn block_size(&self) -> usize {
        if self.block_size == 0 {
            DEFAULT_BLOCK_SIZE
        } else {
            self.block_size
        }
    }

    /// Returns the caller-supplied pool, if one was set.
    pub fn pool(&self) -> Option<&Arc<dyn BlockPool>> {
        self.pool.as_ref()
    }

    /// Whether empty reads are reported as [`BufferError::Empty`].
    ///
    /// [`BufferError::Empty`]: crate::BufferError::Empty
    pub fn signals_empty_reads(&self) -> bool {
        self.signal_empty_reads
    }
}

impl fmt::Debug for BufferConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferConfig")
            .field("block_size", &self.block_size())
            .field("pool", &self.pool.as_ref().map(|_| "external"))
            .field("signal_empty_reads", &self.signal_empty_reads)
            .finish()
    }
}
