use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mtb_decoder::PayloadDecompressor;
use mtb_session::sink::MemorySink;
use mtb_session::transport::MockTransport;
use mtb_session::{SessionConfig, SessionController};
use mtb_tests::{split_cycling, ticket_payload, zlib};

fn bench_feed_chunk_sizes(c: &mut Criterion) {
    let payload = ticket_payload(64 * 1024);
    let stream = zlib(&payload);

    let mut group = c.benchmark_group("feed_chunk_size");
    group.throughput(Throughput::Bytes(stream.len() as u64));

    for size in [16usize, 256, 4096, stream.len()] {
        let chunks = split_cycling(&stream, &[size]);
        group.bench_with_input(BenchmarkId::from_parameter(size), &chunks, |b, chunks| {
            b.iter(|| {
                let mut dec = PayloadDecompressor::new();
                for chunk in chunks {
                    dec.feed(black_box(chunk)).unwrap();
                }
                dec.into_payload().unwrap()
            });
        });
    }
    group.finish();
}

fn bench_session_end_to_end(c: &mut Criterion) {
    let payload = ticket_payload(16 * 1024);
    let stream = zlib(&payload);
    let chunks = split_cycling(&stream, &[200]);
    let config = SessionConfig {
        poll_interval: Duration::ZERO,
        ..SessionConfig::default()
    };

    c.bench_function("session_16k_200b_chunks", |b| {
        b.iter(|| {
            let mut script = vec![Some(b"AISRDS1\x06!".to_vec())];
            script.extend(chunks.iter().cloned().map(Some));
            let mut sink = MemorySink::default();
            SessionController::with_observer(MockTransport::new(script), config.clone(), ())
                .run(&mut sink)
                .unwrap()
        });
    });
}

criterion_group!(benches, bench_feed_chunk_sizes, bench_session_end_to_end);
criterion_main!(benches);
