#![no_main]

use chainbuf::{BufferConfig, BufferError, ChainBuffer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Vec<u8>| {
    // Block sizes straddling typical input lengths, plus the default
    let block_sizes = [1, 7, 64, 4096];

    for block_size in block_sizes {
        let buffer = ChainBuffer::new(BufferConfig::new().with_block_size(block_size));

        // Write in uneven slices derived from the input itself
        let step = (data.first().copied().unwrap_or(1) as usize).max(1);
        for piece in data.chunks(step) {
            assert_eq!(buffer.write(piece), Ok(piece.len()));
        }
        buffer.finish();

        // Read back at a different, also uneven, granularity
        let mut out = Vec::new();
        let mut buf = vec![0_u8; step * 2 + 3];
        loop {
            match buffer.read(&mut buf) {
                Ok(n) => out.extend_from_slice(&buf[..n]),
                Err(BufferError::EndOfStream) => break,
                Err(e) => panic!("unexpected read error: {e}"),
            }
        }

        // Verify: every byte comes back, in order, exactly once
        assert_eq!(out, data);
        assert!(buffer.is_empty());
    }
});
