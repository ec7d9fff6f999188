use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use minid::{MinidGen, Mode, pack, unpack};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for mode in Mode::ALL {
        // a fresh generator per mode keeps the duplicate registries apart
        let mut generator = MinidGen::new(mode, 6).expect("valid generator params");
        group.bench_function(mode.as_str(), |b| {
            b.iter(|| black_box(generator.next_minid().expect("unique suffix")))
        });
    }
    group.bench_function("nanoid", |b| b.iter(|| black_box(nanoid::nanoid!())));
    group.bench_function("ulid", |b| b.iter(|| black_box(ulid::Ulid::new())));
    group.finish();
}

fn bench_packed(c: &mut Criterion) {
    let id = "1114KOab3xYz";
    let bytes = pack(id);
    c.bench_function("pack", |b| b.iter(|| black_box(pack(black_box(id)))));
    c.bench_function("unpack", |b| {
        b.iter(|| black_box(unpack(black_box(&bytes)).expect("valid packed id")))
    });
}

criterion_group!(benches, bench_generate, bench_packed);
criterion_main!(benches);
