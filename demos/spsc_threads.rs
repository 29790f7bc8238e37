//! One producer thread, one consumer thread, one buffer.
//!
//! Run with:
//!     cargo run --example spsc_threads

use std::sync::Arc;

use chainbuf::{BufferConfig, BufferError, ChainBuffer};

const TOTAL: usize = 10_000_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let buffer = Arc::new(ChainBuffer::new(BufferConfig::new().with_block_size(4096)));
    let producer = Arc::clone(&buffer);

    let writer = std::thread::spawn(move || {
        let mut written = 0_usize;
        let mut chunk = [0_u8; 100];
        while written < TOTAL {
            let n = chunk.len().min(TOTAL - written);
            // Counting pattern so the consumer can verify integrity
            for (i, byte) in chunk[..n].iter_mut().enumerate() {
                *byte = ((written + i) % 256) as u8;
            }
            written += producer.write(&chunk[..n]).expect("stream is open");
        }
        producer.finish();
        written
    });

    let mut read = 0_usize;
    let mut buf = [0_u8; 650];
    loop {
        match buffer.read(&mut buf) {
            Ok(n) => {
                for (i, &byte) in buf[..n].iter().enumerate() {
                    assert_eq!(byte, ((read + i) % 256) as u8, "payload corrupted");
                }
                read += n;
            }
            Err(BufferError::EndOfStream) => break,
            Err(e) => return Err(e.into()),
        }
    }

    let written = writer.join().expect("producer panicked");
    println!("producer wrote {} bytes, consumer read {} bytes", written, read);
    assert_eq!(written, read);

    Ok(())
}
