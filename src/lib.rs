//! chainbuf
//!
//! Growable byte FIFO built from fixed-size, recyclable blocks.
//!
//! `chainbuf` decouples a producer writing bytes from a consumer reading
//! them when neither side knows the other's pacing or the total volume in
//! advance. Instead of reallocating one contiguous region, the buffer grows
//! as a chain of fixed-capacity blocks; instead of freeing drained blocks,
//! it returns them to a recycling pool for reuse. It is designed as a
//! small, composable primitive for:
//!
//! - pipelines bridging bursty producers and steady consumers
//! - protocol plumbing that stages bytes between parse passes
//! - handing byte streams across threads without backpressure
//!
//! The crate intentionally:
//! - does NOT block or apply backpressure (writes always grow the chain)
//! - does NOT schedule threads of its own (callers drive it)
//! - does NOT support multiple writers or multiple readers at once
//! - does NOT persist anything
//!
//! It only does one thing: **bytes in -> bytes out, in order**
//!
//! # Basic use
//!
//! ```
//! use chainbuf::{BufferError, ChainBuffer};
//!
//! fn main() -> Result<(), BufferError> {
//!     let buffer = ChainBuffer::default();
//!
//!     buffer.write(b"some bytes")?;
//!     buffer.write(b", some more")?;
//!     buffer.finish();
//!
//!     let mut out = vec![0_u8; 64];
//!     loop {
//!         match buffer.read(&mut out) {
//!             Ok(n) => println!("read {} bytes", n),
//!             Err(BufferError::EndOfStream) => break,
//!             Err(e) => return Err(e),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # One writer, one reader
//!
//! ```
//! use std::sync::Arc;
//! use chainbuf::{BufferError, ChainBuffer};
//!
//! let buffer = Arc::new(ChainBuffer::default());
//! let producer = Arc::clone(&buffer);
//!
//! let handle = std::thread::spawn(move || {
//!     for _ in 0..100 {
//!         producer.write(&[0xAB; 1000]).unwrap();
//!     }
//!     producer.finish();
//! });
//!
//! let mut out = vec![0_u8; 4096];
//! let mut total = 0;
//! loop {
//!     match buffer.read(&mut out) {
//!         Ok(n) => total += n,
//!         Err(BufferError::EndOfStream) => break,
//!         Err(e) => panic!("{e}"),
//!     }
//! }
//! handle.join().unwrap();
//! assert_eq!(total, 100 * 1000);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod block;
mod buffer;
mod config;
mod error;

mod util; // internal helpers

//
// Public surface (intentionally tiny)
//

pub use block::Block;
pub use buffer::ChainBuffer;
pub use buffer::pool::{BlockPool, RecyclePool};
pub use config::{BufferConfig, DEFAULT_BLOCK_SIZE};
pub use error::BufferError;
