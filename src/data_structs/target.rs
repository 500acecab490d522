use std::ops::Range;

use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::enums::Strand;
use crate::data_structs::typedef::*;
use crate::error::PatternError;
use crate::with_field_fn;

/// Target window and the overlap filter applied to reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub chr:            ChrIdType,
    /// 1-based, inclusive.
    pub start:          PosType,
    /// 1-based, inclusive.
    pub end:            PosType,
    /// Minimum number of read bases inside the window.
    #[serde(default = "default_min_overlap")]
    pub min_overlap:    i64,
    /// Restrict the scan to the part of a read inside the window.
    #[serde(default)]
    pub clip:           bool,
    /// Shift of reverse strand coordinates: 0 for CHH, 1 for CpG, 2 for CHG.
    #[serde(default)]
    pub reverse_offset: PosType,
}

fn default_min_overlap() -> i64 {
    1
}

impl TargetSpec {
    pub fn new(
        chr: ChrIdType,
        start: PosType,
        end: PosType,
    ) -> Self {
        Self {
            chr,
            start,
            end,
            min_overlap: default_min_overlap(),
            clip: false,
            reverse_offset: 0,
        }
    }

    with_field_fn!(min_overlap, i64);
    with_field_fn!(clip, bool);
    with_field_fn!(reverse_offset, PosType);

    pub fn validate(&self) -> Result<(), PatternError> {
        if self.end < self.start {
            return Err(PatternError::MalformedTarget {
                start: self.start,
                end:   self.end,
            });
        }
        Ok(())
    }

    /// Coordinate offset applied to calls of a read on `strand`.
    pub fn strand_offset(
        &self,
        strand: Strand,
    ) -> PosType {
        if strand.is_reverse() {
            self.reverse_offset
        }
        else {
            0
        }
    }

    /// Overlap filter. Returns the range of call string indices to scan for a
    /// read starting at `read_start` with `read_len` calls, or `None` if the
    /// read does not overlap the window by at least `min_overlap` bases.
    pub fn scan_range(
        &self,
        read_start: PosType,
        read_len: usize,
    ) -> Option<ScanRange> {
        if read_len == 0 {
            return None;
        }
        let start = read_start as i64;
        let len = read_len as i64;
        let read_end = start + len - 1;
        let over_start = start.max(self.start as i64);
        let over_end = read_end.min(self.end as i64);
        let overlap = over_end - over_start + 1;
        if overlap < self.min_overlap {
            return None;
        }

        let range = if self.clip {
            let begin = (over_start - start).min(len);
            let end = (begin + overlap.max(0)).min(len);
            begin as usize..end as usize
        }
        else {
            0..read_len
        };
        Some(ScanRange { range, overlap })
    }
}

/// Range of call string indices scanned for one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRange {
    range:   Range<usize>,
    overlap: i64,
}

impl ScanRange {
    pub fn begin(&self) -> usize {
        self.range.start
    }

    /// Exclusive end.
    pub fn end(&self) -> usize {
        self.range.end
    }

    pub fn overlap(&self) -> i64 {
        self.overlap
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn contains(
        &self,
        idx: usize,
    ) -> bool {
        self.range.contains(&idx)
    }

    pub fn indices(&self) -> Range<usize> {
        self.range.clone()
    }
}

/// Reference position of call `idx` of a read starting at `read_start`, or
/// `None` if it does not fit [`PosType`].
#[inline]
pub fn read_position(
    read_start: PosType,
    idx: usize,
) -> Option<PosType> {
    PosType::try_from(read_start as u64 + idx as u64).ok()
}

/// Genomic position of call `idx` of a read starting at `read_start`, shifted
/// left by `offset`. Returns `None` when the shift leaves the chromosome.
#[inline]
pub fn position_at(
    read_start: PosType,
    idx: usize,
    offset: PosType,
) -> Option<PosType> {
    read_position(read_start, idx)?
        .checked_sub(offset)
        .filter(|pos| *pos >= 1)
}

/// Index of the call string character covering `pos` for a read starting at
/// `read_start`.
#[inline]
pub fn index_of(
    read_start: PosType,
    pos: PosType,
) -> Option<usize> {
    pos.checked_sub(read_start).map(|idx| idx as usize)
}
