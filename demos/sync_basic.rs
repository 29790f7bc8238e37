//! Basic synchronous write/drain example.
//!
//! Run with:
//!     cargo run --example sync_basic

use chainbuf::{BufferConfig, BufferError, ChainBuffer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Small blocks so the chain visibly grows
    let buffer = ChainBuffer::new(BufferConfig::new().with_block_size(1024));

    // Produce 10 KiB in 300-byte bursts
    let burst = vec![0xAB_u8; 300];
    let mut written = 0;
    while written < 10 * 1024 {
        written += buffer.write(&burst)?;
    }
    println!("wrote {} bytes into {}-byte blocks", written, buffer.block_size());

    // Declare end of input; buffered bytes remain readable
    buffer.finish();

    // Drain in chunks of an unrelated size
    let mut out = vec![0_u8; 700];
    let mut reads = 0;
    let mut total = 0;
    loop {
        match buffer.read(&mut out) {
            Ok(n) => {
                reads += 1;
                total += n;
            }
            Err(BufferError::EndOfStream) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("drained {} bytes in {} reads", total, reads);
    println!("buffer empty: {}", buffer.is_empty());

    Ok(())
}
