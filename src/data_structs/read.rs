use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::enums::Strand;
use crate::data_structs::template_store::TemplateStore;
use crate::data_structs::typedef::*;
use crate::error::PatternError;

/// Aligned read. Its call string and sequence live in the
/// [`TemplateStore`](crate::TemplateStore) under `templid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Read {
    pub chr:     ChrIdType,
    pub strand:  Strand,
    /// 1-based leftmost reference position.
    pub start:   PosType,
    pub templid: TemplateIdType,
}

impl Read {
    pub fn new(
        chr: ChrIdType,
        strand: Strand,
        start: PosType,
        templid: TemplateIdType,
    ) -> Self {
        Self {
            chr,
            strand,
            start,
            templid,
        }
    }
}

/// Immutable collection of reads of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadColumns {
    reads: Vec<Read>,
}

impl ReadColumns {
    /// Creates the collection from parallel columns, failing if their lengths
    /// differ.
    pub fn try_from_columns(
        rname: Vec<ChrIdType>,
        strand: Vec<Strand>,
        start: Vec<PosType>,
        templid: Vec<TemplateIdType>,
    ) -> Result<Self, PatternError> {
        let expected = rname.len();
        for (column, found) in [
            ("strand", strand.len()),
            ("start", start.len()),
            ("templid", templid.len()),
        ] {
            if found != expected {
                return Err(PatternError::ColumnLengthMismatch {
                    column,
                    expected,
                    found,
                });
            }
        }

        let reads = itertools::izip!(rname, strand, start, templid)
            .map(|(chr, strand, start, templid)| {
                Read::new(chr, strand, start, templid)
            })
            .collect();
        Ok(Self { reads })
    }

    pub fn from_reads(reads: Vec<Read>) -> Self {
        Self { reads }
    }

    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    pub fn get(
        &self,
        idx: usize,
    ) -> Option<&Read> {
        self.reads.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Read> {
        self.reads.iter()
    }

    pub fn reads(&self) -> &[Read] {
        &self.reads
    }

    /// Checks that every read refers to an existing template.
    pub fn check_templates(
        &self,
        n_templates: usize,
    ) -> Result<(), PatternError> {
        match self
            .reads
            .iter()
            .position(|read| read.templid >= n_templates)
        {
            Some(read) => Err(PatternError::TemplateOutOfRange {
                read,
                templid: self.reads[read].templid,
                n_templates,
            }),
            None => Ok(()),
        }
    }
}

impl ReadColumns {
    /// Checks that the last call of every read maps to a representable
    /// position. Reads must refer to existing templates.
    pub fn check_extents<S: AsRef<[u8]>>(
        &self,
        store: &TemplateStore<'_, S>,
    ) -> Result<(), PatternError> {
        for (idx, read) in self.reads.iter().enumerate() {
            let len = store.call_string(read.templid).map_or(0, <[u8]>::len);
            if len == 0 {
                continue;
            }
            if read.start as u64 + len as u64 - 1 > PosType::MAX as u64 {
                return Err(PatternError::ReadOutOfBounds {
                    read: idx,
                    start: read.start,
                    len,
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<Read> for ReadColumns {
    fn from_iter<T: IntoIterator<Item = Read>>(iter: T) -> Self {
        Self::from_reads(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ReadColumns {
    type IntoIter = std::slice::Iter<'a, Read>;
    type Item = &'a Read;

    fn into_iter(self) -> Self::IntoIter {
        self.reads.iter()
    }
}
