//! Block recycling pool for efficient memory reuse.

use std::sync::{Arc, Mutex};

use crate::block::Block;
use crate::util::lock;

/// A store of depleted, reset blocks kept ready for reuse.
///
/// Both sides of the buffer use the pool, potentially from different
/// threads: the write side acquires blocks to grow the chain, the read side
/// releases drained blocks back. Implementations must therefore support
/// concurrent `acquire`/`release`.
///
/// A caller-owned pool can be shared across several buffers via
/// [`BufferConfig::with_pool`]; pools are logically unbounded and allocate a
/// fresh block whenever they have none to hand out.
///
/// [`BufferConfig::with_pool`]: crate::BufferConfig::with_pool
pub trait BlockPool: Send + Sync {
    /// Returns a reset block of exactly `block_size` capacity, recycling a
    /// stored one when possible and allocating fresh otherwise.
    fn acquire(&self, block_size: usize) -> Arc<Block>;

    /// Resets `block` and stores it for reuse.
    ///
    /// The block must be detached from any chain; the buffer only releases
    /// depleted heads it has already unlinked.
    fn release(&self, block: Arc<Block>);
}

/// The default unbounded free-list pool.
///
/// Backed by a mutex-guarded vector; acquire pops, release pushes. Blocks
/// whose capacity does not match the requested size (possible when one
/// shared pool serves buffers with different block sizes) are discarded
/// instead of handed out.
#[derive(Debug, Default)]
pub struct RecyclePool {
    free: Mutex<Vec<Arc<Block>>>,
}

impl RecyclePool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blocks currently stored for reuse.
    pub fn free_blocks(&self) -> usize {
        lock(&self.free).len()
    }
}

impl BlockPool for RecyclePool {
    fn acquire(&self, block_size: usize) -> Arc<Block> {
        while let Some(block) = lock(&self.free).pop() {
            if block.capacity() == block_size {
                return block;
            }
            // Wrong-sized stragglers from another buffer; let them drop.
        }
        Arc::new(Block::new(block_size))
    }

    fn release(&self, block: Arc<Block>) {
        block.reset();
        lock(&self.free).push(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_allocates_when_empty() {
        let pool = RecyclePool::new();
        let block = pool.acquire(128);
        assert_eq!(block.capacity(), 128);
        assert_eq!(pool.free_blocks(), 0);
    }

    #[test]
    fn test_release_then_acquire_reuses() {
        let pool = RecyclePool::new();
        let block = pool.acquire(128);
        block.write_from(b"dirty");

        pool.release(block);
        assert_eq!(pool.free_blocks(), 1);

        let reused = pool.acquire(128);
        assert_eq!(pool.free_blocks(), 0);

        // Came back reset: accepts a full capacity write again.
        let mut out = [0_u8; 8];
        assert_eq!(
            reused.read_into(&mut out),
            crate::block::BlockRead::Exhausted
        );
    }

    #[test]
    fn test_mismatched_capacity_is_discarded() {
        let pool = RecyclePool::new();
        pool.release(Arc::new(Block::new(64)));
        pool.release(Arc::new(Block::new(64)));

        let block = pool.acquire(4096);
        assert_eq!(block.capacity(), 4096);
        assert_eq!(pool.free_blocks(), 0);
    }
}
