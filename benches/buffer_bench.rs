//! Benchmarks for chainbuf.
//!
//! Run with:
//!     cargo bench

use std::sync::Arc;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use chainbuf::{BufferConfig, BufferError, ChainBuffer};

const BLOCK_SIZE: usize = 4096;

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");

    for total in [100 * 1024, 1024 * 1024] {
        let chunk = vec![0xA5_u8; 100];

        group.throughput(Throughput::Bytes(total as u64));
        group.bench_with_input(format!("{}kb", total / 1024), &chunk, |b, chunk| {
            b.iter(|| {
                let buffer = ChainBuffer::new(BufferConfig::new().with_block_size(BLOCK_SIZE));
                let mut written = 0;
                while written < total {
                    written += buffer.write(black_box(chunk)).unwrap();
                }
                black_box(written)
            });
        });
    }

    group.finish();
}

fn bench_write_then_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_then_drain");
    let total = 1024 * 1024;
    let chunk = vec![0xA5_u8; 100];

    group.throughput(Throughput::Bytes(total as u64));
    group.bench_function("1mb_reuse", |b| {
        // One buffer across iterations, so the pool does its job and the
        // steady state is allocation-free.
        let buffer = ChainBuffer::new(BufferConfig::new().with_block_size(BLOCK_SIZE));
        let mut out = vec![0_u8; 1000];

        b.iter(|| {
            let mut written = 0;
            while written < total {
                written += buffer.write(black_box(&chunk)).unwrap();
            }
            let mut read = 0;
            while read < written {
                read += buffer.read(&mut out).unwrap();
            }
            black_box(read)
        });
    });

    group.finish();
}

fn bench_concurrent_spsc(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc");
    let total = 1024 * 1024;

    group.throughput(Throughput::Bytes(total as u64));
    group.bench_function("1mb_threads", |b| {
        b.iter(|| {
            let buffer = Arc::new(ChainBuffer::new(
                BufferConfig::new().with_block_size(BLOCK_SIZE),
            ));
            let producer = Arc::clone(&buffer);

            let writer = std::thread::spawn(move || {
                let chunk = [0xA5_u8; 100];
                let mut written = 0;
                while written < total {
                    written += producer.write(&chunk).unwrap();
                }
                producer.finish();
            });

            let mut out = vec![0_u8; 1000];
            let mut read = 0;
            loop {
                match buffer.read(&mut out) {
                    Ok(n) => read += n,
                    Err(BufferError::EndOfStream) => break,
                    Err(e) => panic!("{e}"),
                }
            }

            writer.join().unwrap();
            black_box(read)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_write,
    bench_write_then_drain,
    bench_concurrent_spsc
);
criterion_main!(benches);
