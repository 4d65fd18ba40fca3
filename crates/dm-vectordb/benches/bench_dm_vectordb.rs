use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dm_core::Record;
use dm_vectordb::store::codec;
use dm_vectordb::VectorIndex;
use rand::Rng;

fn random_vector(dim: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..dim).map(|_| rng.gen::<f32>() + 0.01).collect()
}

fn records(n: usize, dim: usize) -> Vec<(Record, Vec<f32>)> {
    (0..n)
        .map(|i| (Record::new(format!("r{i}"), format!("record {i}")), random_vector(dim)))
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let dim = 256;
    c.bench_function("build_1k_256d", |b| {
        b.iter_batched(
            || records(1000, dim),
            |batch| black_box(VectorIndex::build(batch).unwrap()),
            criterion::BatchSize::LargeInput,
        )
    });
}

fn bench_search(c: &mut Criterion) {
    let dim = 256;
    let idx = VectorIndex::build(records(5000, dim)).unwrap();

    c.bench_function("search_top2_from_5k", |b| {
        let query = random_vector(dim);
        b.iter(|| {
            black_box(idx.search(&query, 2).unwrap());
        })
    });

    c.bench_function("search_all_from_5k", |b| {
        let query = random_vector(dim);
        b.iter(|| {
            black_box(idx.search(&query, 5000).unwrap());
        })
    });
}

fn bench_codec(c: &mut Criterion) {
    let idx = VectorIndex::build(records(2000, 256)).unwrap();
    let bytes = codec::encode(&idx).unwrap();
    c.bench_function("encode_2k_256d", |b| {
        b.iter(|| black_box(codec::encode(&idx).unwrap()))
    });
    c.bench_function("decode_2k_256d", |b| {
        b.iter(|| black_box(codec::decode(&bytes).unwrap()))
    });
}

criterion_group!(benches, bench_build, bench_search, bench_codec);
criterion_main!(benches);
