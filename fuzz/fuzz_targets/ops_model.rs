#![no_main]

use std::collections::VecDeque;

use chainbuf::{BufferConfig, BufferError, ChainBuffer};
use libfuzzer_sys::fuzz_target;

// Differential fuzzing against a VecDeque<u8> model: interpret the input as
// a script of write/read/finish/reopen ops and require identical observable
// behavior from both.
fuzz_target!(|script: Vec<u8>| {
    let buffer = ChainBuffer::new(BufferConfig::new().with_block_size(16));
    let mut model: VecDeque<u8> = VecDeque::new();
    let mut closed = false;
    let mut next_byte = 0_u8;

    for op in script {
        match op % 4 {
            // Write `op` bytes of a counting pattern
            0 => {
                let mut chunk = Vec::with_capacity(op as usize);
                for _ in 0..op {
                    chunk.push(next_byte);
                    next_byte = next_byte.wrapping_add(1);
                }
                match buffer.write(&chunk) {
                    Ok(n) => {
                        assert!(!closed);
                        assert_eq!(n, chunk.len());
                        model.extend(&chunk);
                    }
                    Err(BufferError::StreamClosed) => assert!(closed),
                    Err(e) => panic!("unexpected write error: {e}"),
                }
            }
            // Read up to `op + 1` bytes
            1 => {
                let mut buf = vec![0_u8; op as usize + 1];
                match buffer.read(&mut buf) {
                    Ok(n) => {
                        assert!(n <= model.len(), "read returned bytes never written");
                        let expected: Vec<u8> = model.drain(..n).collect();
                        assert_eq!(&buf[..n], &expected[..], "order or content diverged");
                        // Single-threaded: a closed, drained stream must
                        // report EOS rather than an empty success.
                        if n == 0 {
                            assert!(!closed);
                        }
                    }
                    Err(BufferError::EndOfStream) => {
                        assert!(closed, "EOS reported on an open stream");
                        assert!(model.is_empty(), "EOS reported with bytes left");
                    }
                    Err(e) => panic!("unexpected read error: {e}"),
                }
            }
            2 => {
                buffer.finish();
                closed = true;
            }
            _ => {
                buffer.reopen();
                closed = false;
            }
        }

        assert_eq!(buffer.is_empty(), model.is_empty());
    }

    // Drain whatever is left and settle the books
    buffer.finish();
    let mut total = 0;
    let mut buf = [0_u8; 33];
    loop {
        match buffer.read(&mut buf) {
            Ok(n) => total += n,
            Err(BufferError::EndOfStream) => break,
            Err(e) => panic!("unexpected read error: {e}"),
        }
    }
    assert_eq!(total, model.len(), "conservation violated");
});
