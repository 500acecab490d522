use std::collections::BTreeSet;
use std::hash::Hasher;

use hashbrown::HashSet;
use log::debug;

use crate::data_structs::context::{
    base_code,
    call_code,
    is_methylated,
    is_na_code,
    CategoryCode,
    ContextSet,
};
use crate::data_structs::target::{
    index_of,
    position_at,
    read_position,
};
use crate::data_structs::typedef::*;
use crate::data_structs::Strand;
use crate::tools::patterns::Candidate;

pub const FNV_OFFSET_BASIS: u64 = 14695981039346656037;
pub const FNV_PRIME: u64 = 1099511628211;

/// 64-bit FNV-1a hasher.
///
/// Positions are hashed as their little-endian bytes, so hashes do not depend
/// on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fnv1a(u64);

impl Default for Fnv1a {
    fn default() -> Self {
        Self(FNV_OFFSET_BASIS)
    }
}

impl Fnv1a {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a position followed by the byte observed there.
    #[inline]
    pub fn write_entry(
        &mut self,
        pos: PosType,
        byte: u8,
    ) {
        self.write(&pos.to_le_bytes());
        self.write_u8(byte);
    }

    /// True if nothing changed the hash since creation.
    pub fn is_basis(&self) -> bool {
        self.0 == FNV_OFFSET_BASIS
    }
}

impl Hasher for Fnv1a {
    #[inline]
    fn write(
        &mut self,
        bytes: &[u8],
    ) {
        for byte in bytes {
            self.0 ^= *byte as u64;
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

/// Summary of one emitted pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternRecord {
    pub hash:   u64,
    pub strand: Strand,
    pub start:  PosType,
    pub end:    PosType,
    /// Number of in-context calls, always at least 1.
    pub nbase:  CountType,
    /// Fraction of methylated calls among `nbase`.
    pub beta:   DensityType,
}

impl PatternRecord {
    /// Zero-padded, upper-case hex representation of the hash.
    pub fn hash_id(&self) -> String {
        format!("{:016X}", self.hash)
    }
}

/// Pattern with its sparse row of encoded calls and highlighted bases.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternRow {
    pub record: PatternRecord,
    pub calls:  Vec<(PosType, CategoryCode)>,
    pub bases:  Vec<(PosType, CategoryCode)>,
}

/// Context call whose code has no valid label. Such calls are left out of the
/// pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallAnomaly {
    pub read_index: usize,
    pub position:   PosType,
    pub byte:       u8,
}

/// Second pass: builds pattern rows restricted to the selected and
/// highlighted positions.
pub struct PatternExtractor<'c> {
    context:   &'c ContextSet,
    selected:  HashSet<PosType>,
    highlight: &'c [PosType],
}

impl<'c> PatternExtractor<'c> {
    pub fn new(
        context: &'c ContextSet,
        selected: &BTreeSet<PosType>,
        highlight: &'c [PosType],
    ) -> Self {
        Self {
            context,
            selected: selected.iter().copied().collect(),
            highlight,
        }
    }

    /// Extracts the pattern of one candidate read. Returns `None` if the read
    /// has no in-context call at a selected position; such a read contributes
    /// no highlighted bases either.
    pub fn extract(
        &self,
        candidate: &Candidate<'_>,
        seq: &[u8],
        anomalies: &mut Vec<CallAnomaly>,
    ) -> Option<PatternRow> {
        let read = candidate.read;
        let mut hasher = Fnv1a::new();
        let mut meth: CountType = 0;
        let mut total: CountType = 0;
        let mut calls = Vec::new();

        for i in candidate.range.indices() {
            let byte = candidate.calls[i];
            if !self.context.contains(byte) {
                continue;
            }
            let pos = match position_at(read.start, i, candidate.offset) {
                Some(pos) if self.selected.contains(&pos) => pos,
                _ => continue,
            };
            let code = call_code(byte);
            if is_na_code(code) {
                debug!(
                    "Skipping call {:?} of read {} at {}: no category",
                    byte as char, candidate.index, pos
                );
                anomalies.push(CallAnomaly {
                    read_index: candidate.index,
                    position: pos,
                    byte,
                });
                continue;
            }
            calls.push((pos, code));
            total += 1;
            if is_methylated(code) {
                meth += 1;
            }
            hasher.write_entry(pos, byte);
        }

        if hasher.is_basis() {
            return None;
        }

        let mut bases = Vec::new();
        for &pos in self.highlight {
            let idx = match index_of(read.start, pos) {
                Some(idx) if candidate.range.contains(idx) => idx,
                _ => continue,
            };
            let Some(&byte) = seq.get(idx) else {
                continue;
            };
            if let Some(code) = base_code(byte) {
                bases.push((pos, code));
                hasher.write_entry(pos, byte);
            }
        }

        // Non-empty range: at least one call was hashed.
        let start = read_position(read.start, candidate.range.begin())?;
        let end = read_position(read.start, candidate.range.end() - 1)?;
        let record = PatternRecord {
            hash: hasher.finish(),
            strand: read.strand,
            start,
            end,
            nbase: total,
            beta: meth as DensityType / total as DensityType,
        };
        Some(PatternRow {
            record,
            calls,
            bases,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structs::read::Read;
    use crate::data_structs::target::TargetSpec;

    fn fnv_of(bytes: &[u8]) -> u64 {
        let mut hasher = Fnv1a::new();
        hasher.write(bytes);
        hasher.finish()
    }

    #[test]
    fn fnv1a_reference_values() {
        assert_eq!(fnv_of(b""), 0xcbf29ce484222325);
        assert_eq!(fnv_of(b"a"), 0xaf63dc4c8601ec8c);
        assert_eq!(fnv_of(b"foobar"), 0x85944171f73967e8);
    }

    #[test]
    fn entry_hashes_position_bytes_first() {
        let mut hasher = Fnv1a::new();
        hasher.write_entry(100, b'Z');
        assert_eq!(hasher.finish(), fnv_of(&[100, 0, 0, 0, b'Z']));
        assert!(!hasher.is_basis());
    }

    #[test]
    fn hash_id_is_padded_uppercase() {
        let record = PatternRecord {
            hash:   0xab,
            strand: Strand::Forward,
            start:  1,
            end:    1,
            nbase:  1,
            beta:   1.0,
        };
        assert_eq!(record.hash_id(), "00000000000000AB");
    }

    fn run(
        read: Read,
        calls: &[u8],
        seq: &[u8],
        target: &TargetSpec,
        selected: &[PosType],
        highlight: &[PosType],
    ) -> (Option<PatternRow>, Vec<CallAnomaly>) {
        let context = ContextSet::from("zZ");
        let selected = selected.iter().copied().collect();
        let extractor = PatternExtractor::new(&context, &selected, highlight);
        let candidate = Candidate {
            index: 0,
            read: &read,
            calls,
            range: target.scan_range(read.start, calls.len()).unwrap(),
            offset: target.strand_offset(read.strand),
        };
        let mut anomalies = Vec::new();
        let row = extractor.extract(&candidate, seq, &mut anomalies);
        (row, anomalies)
    }

    #[test]
    fn extracts_calls_and_beta() {
        let target = TargetSpec::new(1, 100, 104);
        let read = Read::new(1, Strand::Forward, 100, 0);
        let (row, anomalies) =
            run(read, b"ZhzZz", b"CACCC", &target, &[100, 102, 103], &[]);
        let row = row.unwrap();

        assert!(anomalies.is_empty());
        assert_eq!(row.calls, vec![(100, 7), (102, 15), (103, 7)]);
        assert_eq!(row.record.nbase, 3);
        assert_eq!(row.record.beta, 2.0 / 3.0);
        assert_eq!((row.record.start, row.record.end), (100, 104));

        let mut expected = Fnv1a::new();
        expected.write_entry(100, b'Z');
        expected.write_entry(102, b'z');
        expected.write_entry(103, b'Z');
        assert_eq!(row.record.hash, expected.finish());
    }

    #[test]
    fn read_without_selected_calls_is_dropped() {
        let target = TargetSpec::new(1, 100, 104);
        let read = Read::new(1, Strand::Forward, 100, 0);
        let (row, _) = run(read, b"hhhhh", b"ACGTA", &target, &[100], &[101]);
        assert!(row.is_none());
    }

    #[test]
    fn highlights_use_sequence_bases() {
        let target = TargetSpec::new(1, 100, 104);
        let read = Read::new(1, Strand::Forward, 100, 0);
        let (row, _) = run(
            read,
            b"Z....",
            b"CACGT",
            &target,
            &[100],
            &[99, 101, 102, 103, 104, 105],
        );
        let row = row.unwrap();
        assert_eq!(row.bases, vec![(101, 3), (102, 4), (103, 12), (104, 11)]);
        assert_eq!(row.record.nbase, 1);
    }

    #[test]
    fn highlight_skips_non_acgt() {
        let target = TargetSpec::new(1, 100, 104);
        let read = Read::new(1, Strand::Forward, 100, 0);
        let (row, _) = run(read, b"Z....", b"CNc-T", &target, &[100], &[101, 102, 103, 104]);
        assert_eq!(row.unwrap().bases, vec![(104, 11)]);
    }

    #[test]
    fn clipped_range_limits_highlights() {
        let target = TargetSpec::new(1, 102, 110).with_clip(true);
        let read = Read::new(1, Strand::Forward, 100, 0);
        let (row, _) = run(read, b"ZZZZZ", b"AAAAA", &target, &[100, 102, 103], &[101, 104]);
        let row = row.unwrap();
        assert_eq!(row.calls, vec![(102, 7), (103, 7)]);
        assert_eq!(row.bases, vec![(104, 3)]);
        assert_eq!((row.record.start, row.record.end), (102, 104));
    }
}
