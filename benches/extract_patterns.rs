use bsxpatterns::prelude::*;
use criterion::{
    black_box,
    criterion_group,
    criterion_main,
    Criterion,
};
use rand::{
    Rng,
    SeedableRng,
};
use rand_chacha::ChaCha8Rng;

const CALL_CHARS: &[u8] = b"zZhHhHxX....";
const SEQ_CHARS: &[u8] = b"ACGT";

fn generate_templates(
    n_reads: usize,
    seed: u64,
) -> (ReadColumns, Vec<Vec<u8>>, Vec<Vec<u8>>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut reads = Vec::with_capacity(n_reads);
    let mut calls = Vec::with_capacity(n_reads);
    let mut seqs = Vec::with_capacity(n_reads);
    for templid in 0..n_reads {
        let length = rng.gen_range(100..300usize);
        let start = rng.gen_range(9_700..10_500);
        let strand = if rng.gen_bool(0.5) {
            Strand::Forward
        }
        else {
            Strand::Reverse
        };
        reads.push(Read::new(0, strand, start, templid));
        calls.push(
            (0..length)
                .map(|_| CALL_CHARS[rng.gen_range(0..CALL_CHARS.len())])
                .collect(),
        );
        seqs.push(
            (0..length)
                .map(|_| SEQ_CHARS[rng.gen_range(0..SEQ_CHARS.len())])
                .collect(),
        );
    }
    (ReadColumns::from_reads(reads), calls, seqs)
}

fn bench_extract(c: &mut Criterion) {
    let (reads, calls, seqs) = generate_templates(50_000, 42);
    let store = TemplateStore::try_new(&calls, &seqs).unwrap();
    let target = TargetSpec::new(0, 10_000, 10_400)
        .with_clip(true)
        .with_reverse_offset(1);

    let mut group = c.benchmark_group("extract_patterns");
    for (name, config) in [
        ("cpg", PatternConfig::default()),
        (
            "cpg_highlight",
            PatternConfig::default().with_highlight(vec![10_100, 10_200, 10_300]),
        ),
        (
            "chh",
            PatternConfig::default().with_context(ContextSet::from("hH")),
        ),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                extract_patterns(
                    black_box(&reads),
                    store,
                    black_box(&target),
                    black_box(&config),
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
