use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use seqwin_core::codec::{encode_indices, encode_one_hot};
use seqwin_core::{EncodingMode, EncodingPolicy, FastaInterval, MemoryStore};

fn generate_test_sequence(length: usize) -> Vec<u8> {
    b"ATCGATCGNNacgt".iter().copied().cycle().take(length).collect()
}

fn bench_encoding(c: &mut Criterion) {
    let sequence = generate_test_sequence(131_072);

    c.bench_function("encode_indices_128kb", |b| {
        b.iter(|| black_box(encode_indices(black_box(&sequence))))
    });

    c.bench_function("encode_one_hot_128kb", |b| {
        b.iter(|| black_box(encode_one_hot(black_box(&sequence))))
    });
}

fn bench_resolve(c: &mut Criterion) {
    let store = MemoryStore::from_records(vec![("chr1", generate_test_sequence(1_000_000))]);
    let mut group = c.benchmark_group("resolve");

    for &context_length in &[1_024u64, 16_384, 131_072] {
        for mode in [EncodingMode::Index, EncodingMode::OneHot] {
            let policy = EncodingPolicy::new()
                .with_context_length(context_length)
                .with_shift_range(-64, 64)
                .with_reverse_complement(true)
                .with_encoding(mode);
            let resolver = FastaInterval::new(&store, policy).unwrap();
            let mut rng = StdRng::seed_from_u64(0);

            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", mode), context_length),
                &context_length,
                |b, _| {
                    b.iter(|| {
                        let resolved = resolver
                            .resolve(&mut rng, "chr1", black_box(400_000), 400_500, true)
                            .unwrap();
                        black_box(resolved)
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_encoding, bench_resolve);
criterion_main!(benches);
