//! # Virtual File Benchmark
//!
//! Measures:
//! 1. Appending items (buffer growth)
//! 2. Rebuilding the item map (sequential walk)
//! 3. Name lookup on a mapped store
//! 4. Serializing and parsing a whole file in memory

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hogl_vf::VirtualFile;

fn build(item_count: usize, payload_len: usize) -> VirtualFile {
    let mut vf = VirtualFile::new(1, 32);
    let payload = vec![0xA5u8; payload_len];
    for i in 0..item_count {
        vf.add_item(&format!("asset_{i}"), (i % 8) as u32, &payload)
            .expect("add_item");
    }
    vf
}

fn bench_add_item(c: &mut Criterion) {
    let mut group = c.benchmark_group("vf_add_item");

    for item_count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(item_count as u64));
        group.bench_with_input(
            BenchmarkId::new("payload_64", item_count),
            &item_count,
            |b, &count| {
                b.iter(|| black_box(build(count, 64)));
            },
        );
    }

    group.finish();
}

fn bench_map_items(c: &mut Criterion) {
    let mut group = c.benchmark_group("vf_map_items");

    for item_count in [100, 1_000, 10_000] {
        let mut vf = build(item_count, 64);
        group.throughput(Throughput::Elements(item_count as u64));
        group.bench_with_input(BenchmarkId::new("remap", item_count), &item_count, |b, _| {
            b.iter(|| vf.map_items().expect("map_items"));
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut vf = build(1_000, 16);
    vf.map_items().expect("map_items");

    c.bench_function("vf_get_item_index_last_of_1000", |b| {
        b.iter(|| vf.get_item_index(black_box("asset_999")).expect("lookup"));
    });
}

fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("vf_roundtrip");

    for payload_len in [256, 4_096, 65_536] {
        let vf = build(64, payload_len);
        let mut bytes = Vec::new();
        vf.write_to(&mut bytes).expect("write_to");

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("write", payload_len), &vf, |b, vf| {
            b.iter(|| {
                let mut out = Vec::with_capacity(bytes.len());
                vf.write_to(&mut out).expect("write_to");
                black_box(out)
            });
        });
        group.bench_with_input(BenchmarkId::new("read", payload_len), &bytes, |b, bytes| {
            b.iter(|| black_box(VirtualFile::read_from(bytes.as_slice()).expect("read_from")));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_add_item, bench_map_items, bench_lookup, bench_roundtrip);
criterion_main!(benches);
