#![allow(dead_code)]
use bsxpatterns::prelude::*;
use rand::{
    Rng,
    SeedableRng,
};
use rand_chacha::ChaCha8Rng;

pub const CALL_CHARS: &[u8] = b"zZzZhHxX..";
pub const SEQ_CHARS: &[u8] = b"ACGTACGTN";

pub fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

fn generate_string(
    rng: &mut ChaCha8Rng,
    alphabet: &[u8],
    length: usize,
) -> Vec<u8> {
    (0..length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect()
}

/// Randomly generated reads with their templates.
pub struct DemoReads {
    pub reads: ReadColumns,
    pub calls: Vec<Vec<u8>>,
    pub seqs:  Vec<Vec<u8>>,
}

impl DemoReads {
    /// Generates `n_reads` reads on chromosomes 0 and 1 around the window
    /// `[window_start, window_end]`.
    pub fn generate(
        n_reads: usize,
        window_start: PosType,
        window_end: PosType,
        seed: u64,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut reads = Vec::with_capacity(n_reads);
        let mut calls = Vec::with_capacity(n_reads);
        let mut seqs = Vec::with_capacity(n_reads);

        for templid in 0..n_reads {
            let length = rng.gen_range(5..40usize);
            let start = rng.gen_range(window_start - 30..window_end + 10);
            let strand = if rng.gen_bool(0.5) {
                Strand::Forward
            }
            else {
                Strand::Reverse
            };
            let chr = if rng.gen_bool(0.8) { 0 } else { 1 };
            reads.push(Read::new(chr, strand, start, templid));
            calls.push(generate_string(&mut rng, CALL_CHARS, length));
            seqs.push(generate_string(&mut rng, SEQ_CHARS, length));
        }

        Self {
            reads: ReadColumns::from_reads(reads),
            calls,
            seqs,
        }
    }

    pub fn store(&self) -> TemplateStore<'_, Vec<u8>> {
        TemplateStore::try_new(&self.calls, &self.seqs).unwrap()
    }

    pub fn run(
        &self,
        target: &TargetSpec,
        config: &PatternConfig,
    ) -> PatternTable {
        PatternScan::new(&self.reads, self.store(), target, config)
            .run()
            .unwrap()
    }
}
