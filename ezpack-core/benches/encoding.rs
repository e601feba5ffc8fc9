use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ezpack_core::{
    decoder::{try_parse_frame, try_parse_frame_zero_copy},
    encoder::{compute_checksum, encode_packet},
};

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for size in [0usize, 16, 64, 255] {
        let payload = vec![0x42u8; size];

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| encode_packet(black_box(0x01), black_box(payload)).unwrap());
        });
    }

    group.finish();
}

fn bench_checksum(c: &mut Criterion) {
    let payload = [0x5Au8; 255];
    c.bench_function("checksum_255", |b| {
        b.iter(|| compute_checksum(black_box(0x01), black_box(&payload)))
    });
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in [0usize, 16, 64, 255] {
        let encoded = encode_packet(0x01, &vec![0x42u8; size]).unwrap();

        group.throughput(Throughput::Bytes(encoded.len() as u64));
        group.bench_with_input(BenchmarkId::new("copy", size), &encoded, |b, frame| {
            b.iter(|| try_parse_frame(black_box(frame)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("zero_copy", size), &encoded, |b, frame| {
            b.iter(|| try_parse_frame_zero_copy(black_box(frame.clone())).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_checksum, bench_parse);
criterion_main!(benches);
