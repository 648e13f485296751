//! Benchmarks for merging and content deduplication

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::io::Cursor;
use wadmerge_rs::core::io::{read_wad, write_wad};
use wadmerge_rs::{Lump, LumpName, Wad, WadKind};

/// A container with `count` lumps, every fourth one sharing a payload
fn build_wad(count: usize, seed: usize) -> Wad {
    let mut lumps = vec![Lump::marker(LumpName::new("S_START").unwrap())];
    for i in 0..count {
        let name = LumpName::new(&format!("L{:05}{}", i, seed % 10)).unwrap();
        let fill = if i % 4 == 0 { 0xEE } else { (i % 251) as u8 };
        lumps.push(Lump::new(name, vec![fill; 256]));
    }
    lumps.push(Lump::marker(LumpName::new("S_END").unwrap()));
    Wad::from_lumps(WadKind::Pwad, lumps)
}

fn benchmark_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for size in [100, 1000, 5000].iter() {
        let a = build_wad(*size, 1);
        let b = build_wad(*size, 2);

        group.bench_with_input(BenchmarkId::new("indexed", size), size, |bench, &size| {
            bench.iter(|| {
                let mut dest = Wad::new(WadKind::Pwad);
                dest.reserve_index(2 * size + 4);
                dest.merge(black_box(&a), false);
                dest.merge(black_box(&b), false);
                dest
            });
        });

        group.bench_with_input(BenchmarkId::new("scan", size), size, |bench, _| {
            bench.iter(|| {
                let mut dest = Wad::new(WadKind::Pwad);
                dest.merge(black_box(&a), false);
                dest.merge(black_box(&b), false);
                dest
            });
        });
    }

    group.finish();
}

fn benchmark_deduplicate(c: &mut Criterion) {
    let mut group = c.benchmark_group("deduplicate");

    for size in [100, 1000].iter() {
        let wad = build_wad(*size, 0);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |bench, _| {
            bench.iter(|| {
                let mut copy = wad.clone();
                black_box(copy.deduplicate())
            });
        });
    }

    group.finish();
}

fn benchmark_codec(c: &mut Criterion) {
    let mut wad = build_wad(2000, 0);
    let mut bytes = Vec::new();
    write_wad(&mut bytes, &mut wad).unwrap();

    c.bench_function("codec_write", |bench| {
        bench.iter(|| {
            let mut out = Vec::with_capacity(bytes.len());
            write_wad(&mut out, &mut wad).unwrap();
            out
        });
    });

    c.bench_function("codec_read", |bench| {
        bench.iter(|| read_wad(&mut Cursor::new(black_box(&bytes))).unwrap());
    });
}

criterion_group!(benches, benchmark_merge, benchmark_deduplicate, benchmark_codec);
criterion_main!(benches);
