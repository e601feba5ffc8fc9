use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ezpack_core::{
    encoder::encode_packet,
    extractor::StreamExtractor,
    scanner::{scan_stream, scan_stream_with_stats},
};

fn make_stream(num_frames: usize, payload_len: usize) -> Vec<u8> {
    let mut stream = Vec::new();
    for i in 0..num_frames {
        let payload = vec![b'x'; payload_len];
        let frame = encode_packet((i % 200) as u8, &payload).unwrap();
        stream.extend_from_slice(&frame);
        if i % 10 == 0 {
            // inject a bit of garbage periodically
            stream.extend_from_slice(b"GARBAGE");
        }
    }
    stream
}

fn bench_scanner(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner");

    for &payload_len in &[4usize, 64, 255] {
        let stream = make_stream(500, payload_len);
        group.throughput(Throughput::Bytes(stream.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("scan_stream", payload_len),
            &stream,
            |b, data| {
                b.iter(|| {
                    let res = scan_stream(data);
                    criterion::black_box(res);
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("scan_stream_with_stats", payload_len),
            &stream,
            |b, data| {
                b.iter(|| {
                    let res = scan_stream_with_stats(data);
                    criterion::black_box(res);
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("extractor_chunked", payload_len),
            &stream,
            |b, data| {
                b.iter(|| {
                    let mut extractor = StreamExtractor::new();
                    let mut count = 0usize;
                    for chunk in data.chunks(64) {
                        extractor.extend(chunk);
                        while extractor.next_packet().is_some() {
                            count += 1;
                        }
                    }
                    criterion::black_box(count);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_scanner);
criterion_main!(benches);
