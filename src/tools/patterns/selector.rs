use std::collections::{
    BTreeMap,
    BTreeSet,
};

use crate::data_structs::context::ContextSet;
use crate::data_structs::target::position_at;
use crate::data_structs::typedef::*;
use crate::tools::patterns::Candidate;

/// Histogram of in-context positions over the reads passing the overlap
/// filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionHistogram {
    counts:          BTreeMap<PosType, CountType>,
    candidate_reads: usize,
}

impl PositionHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts the in-context calls of one candidate read. The read counts
    /// towards the denominator even if it carries no in-context call.
    pub fn observe(
        &mut self,
        candidate: &Candidate<'_>,
        context: &ContextSet,
    ) {
        for i in candidate.range.indices() {
            if !context.contains(candidate.calls[i]) {
                continue;
            }
            if let Some(pos) =
                position_at(candidate.read.start, i, candidate.offset)
            {
                *self.counts.entry(pos).or_insert(0) += 1;
            }
        }
        self.candidate_reads += 1;
    }

    pub fn candidate_reads(&self) -> usize {
        self.candidate_reads
    }

    pub fn counts(&self) -> &BTreeMap<PosType, CountType> {
        &self.counts
    }

    /// Fraction of candidate reads carrying an in-context call at `pos`.
    pub fn frequency(
        &self,
        pos: PosType,
    ) -> DensityType {
        match (self.counts.get(&pos), self.candidate_reads) {
            (Some(count), n) if n > 0 => *count as DensityType / n as DensityType,
            _ => 0.0,
        }
    }

    /// Positions observed in at least `min_ctx_freq` of the candidate reads,
    /// excluding the highlighted ones. `highlight` must be sorted.
    pub fn select(
        &self,
        min_ctx_freq: DensityType,
        highlight: &[PosType],
    ) -> BTreeSet<PosType> {
        if self.candidate_reads == 0 {
            return BTreeSet::new();
        }
        let n = self.candidate_reads as DensityType;
        self.counts
            .iter()
            .filter(|(_, count)| **count as DensityType / n >= min_ctx_freq)
            .map(|(pos, _)| *pos)
            .filter(|pos| highlight.binary_search(pos).is_err())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structs::read::Read;
    use crate::data_structs::target::TargetSpec;
    use crate::data_structs::Strand;

    fn observe_all(
        reads: &[(Read, &[u8])],
        target: &TargetSpec,
        context: &ContextSet,
    ) -> PositionHistogram {
        let mut histogram = PositionHistogram::new();
        for (index, (read, calls)) in reads.iter().enumerate() {
            if let Some(range) = target.scan_range(read.start, calls.len()) {
                let candidate = Candidate {
                    index,
                    read,
                    calls,
                    range,
                    offset: target.strand_offset(read.strand),
                };
                histogram.observe(&candidate, context);
            }
        }
        histogram
    }

    #[test]
    fn counts_context_calls() {
        let target = TargetSpec::new(1, 100, 102);
        let reads: Vec<(Read, &[u8])> = vec![
            (Read::new(1, Strand::Forward, 100, 0), &b"ZzH"[..]),
            (Read::new(1, Strand::Forward, 100, 1), &b"zZH"[..]),
        ];
        let histogram = observe_all(&reads, &target, &ContextSet::from("zZ"));

        assert_eq!(histogram.candidate_reads(), 2);
        assert_eq!(
            histogram.counts().iter().map(|(p, c)| (*p, *c)).collect::<Vec<_>>(),
            vec![(100, 2), (101, 2)]
        );
        assert_eq!(histogram.frequency(100), 1.0);
        assert_eq!(histogram.frequency(102), 0.0);
    }

    #[test]
    fn reverse_offset_shifts_positions() {
        let target = TargetSpec::new(1, 100, 110).with_reverse_offset(1);
        let reads: Vec<(Read, &[u8])> = vec![
            (Read::new(1, Strand::Forward, 100, 0), &b"Z.."[..]),
            (Read::new(1, Strand::Reverse, 100, 1), &b".z."[..]),
        ];
        let histogram = observe_all(&reads, &target, &ContextSet::from("zZ"));
        assert_eq!(histogram.counts().get(&100), Some(&2));
    }

    #[test]
    fn read_without_context_counts_as_candidate() {
        let target = TargetSpec::new(1, 100, 110);
        let reads: Vec<(Read, &[u8])> = vec![
            (Read::new(1, Strand::Forward, 100, 0), &b"Z.."[..]),
            (Read::new(1, Strand::Forward, 100, 1), &b"hhh"[..]),
        ];
        let histogram = observe_all(&reads, &target, &ContextSet::from("zZ"));
        assert_eq!(histogram.candidate_reads(), 2);
        assert_eq!(histogram.frequency(100), 0.5);

        assert!(histogram.select(0.6, &[]).is_empty());
        assert_eq!(histogram.select(0.5, &[]), BTreeSet::from([100]));
    }

    #[test]
    fn highlights_are_not_selected() {
        let target = TargetSpec::new(1, 100, 110);
        let reads: Vec<(Read, &[u8])> =
            vec![(Read::new(1, Strand::Forward, 100, 0), &b"ZZZ"[..])];
        let histogram = observe_all(&reads, &target, &ContextSet::from("zZ"));
        assert_eq!(histogram.select(0.0, &[101]), BTreeSet::from([100, 102]));
    }

    #[test]
    fn empty_histogram_selects_nothing() {
        let histogram = PositionHistogram::new();
        assert!(histogram.select(0.0, &[]).is_empty());
    }
}
