//! Extraction of per-read methylation patterns.
//!
//! The scan is done in two passes over the same immutable read set:
//!
//! 1. [`PositionHistogram`] counts, for every position, the number of reads
//!    passing the overlap filter that carry an in-context call there. Positions
//!    observed in at least `min_ctx_freq` of those reads are selected.
//! 2. [`PatternExtractor`] re-scans the reads and builds one row per read with
//!    the encoded calls at the selected positions and the encoded bases at the
//!    highlighted positions. Rows are identified by a FNV-1a hash of their
//!    content.
//!
//! Rows are assembled into a [`PatternTable`].
//!
//! Both passes check the optional [`CancelToken`] every
//! [`CANCEL_CHECK_INTERVAL`](crate::utils::CANCEL_CHECK_INTERVAL) reads.

mod extractor;
mod selector;
mod table;

use itertools::Itertools;
use log::{
    debug,
    info,
    warn,
};
use serde::{
    Deserialize,
    Serialize,
};

pub use extractor::{
    CallAnomaly,
    Fnv1a,
    PatternExtractor,
    PatternRecord,
    PatternRow,
    FNV_OFFSET_BASIS,
    FNV_PRIME,
};
pub use selector::PositionHistogram;
pub use table::{
    PatternCount,
    PatternTable,
};

use crate::data_structs::context::ContextSet;
use crate::data_structs::read::{
    Read,
    ReadColumns,
};
use crate::data_structs::target::{
    ScanRange,
    TargetSpec,
};
use crate::data_structs::template_store::TemplateStore;
use crate::data_structs::typedef::*;
use crate::error::{
    PatternError,
    ScanPass,
};
use crate::utils::{
    checkpoint,
    CancelToken,
};
use crate::with_field_fn;

/// Parameters of the pattern extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Call characters included in patterns.
    pub context:      ContextSet,
    /// Minimum fraction of overlapping reads carrying an in-context call for
    /// a position to be reported.
    pub min_ctx_freq: DensityType,
    /// Sorted, unique positions whose sequence base is extracted.
    pub highlight:    Vec<PosType>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            context:      ContextSet::default(),
            min_ctx_freq: 0.01,
            highlight:    Vec::new(),
        }
    }
}

impl PatternConfig {
    with_field_fn!(context, ContextSet);
    with_field_fn!(min_ctx_freq, DensityType);
    with_field_fn!(highlight, Vec<PosType>);

    pub fn new(
        context: ContextSet,
        min_ctx_freq: DensityType,
        highlight: Vec<PosType>,
    ) -> Self {
        Self {
            context,
            min_ctx_freq,
            highlight,
        }
    }

    pub fn validate(&self) -> Result<(), PatternError> {
        if !(0.0..=1.0).contains(&self.min_ctx_freq) {
            return Err(PatternError::InvalidFrequency(self.min_ctx_freq));
        }
        if let Some((prev, next)) = self
            .highlight
            .iter()
            .tuple_windows()
            .find(|(prev, next)| prev >= next)
        {
            return Err(PatternError::UnsortedHighlights {
                prev: *prev,
                next: *next,
            });
        }
        let unencodable = self.context.unencodable_chars();
        if !unencodable.is_empty() {
            warn!(
                "Context characters {:?} have no call category and will be \
                 skipped",
                String::from_utf8_lossy(&unencodable)
            );
        }
        Ok(())
    }
}

/// Read passing the overlap filter, with its call string and scan range.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub index:  usize,
    pub read:   &'a Read,
    pub calls:  &'a [u8],
    pub range:  ScanRange,
    /// Coordinate offset of the read's strand.
    pub offset: PosType,
}

/// Single pattern extraction over a borrowed snapshot of reads and templates.
pub struct PatternScan<'a, S: AsRef<[u8]>> {
    reads:  &'a ReadColumns,
    store:  TemplateStore<'a, S>,
    target: &'a TargetSpec,
    config: &'a PatternConfig,
    cancel: Option<CancelToken>,
}

impl<'a, S: AsRef<[u8]>> PatternScan<'a, S> {
    pub fn new(
        reads: &'a ReadColumns,
        store: TemplateStore<'a, S>,
        target: &'a TargetSpec,
        config: &'a PatternConfig,
    ) -> Self {
        Self {
            reads,
            store,
            target,
            config,
            cancel: None,
        }
    }

    pub fn with_cancel_token(
        mut self,
        token: CancelToken,
    ) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Runs both passes and assembles the pattern table.
    pub fn run(&self) -> Result<PatternTable, PatternError> {
        self.target.validate()?;
        self.config.validate()?;
        self.reads.check_templates(self.store.len())?;
        self.reads.check_extents(&self.store)?;

        let histogram = self.select_positions()?;
        debug!(
            "Observed {} context positions in {} candidate reads",
            histogram.counts().len(),
            histogram.candidate_reads()
        );
        if histogram.candidate_reads() == 0 {
            info!(
                "No reads overlap target {}:{}-{}",
                self.target.chr, self.target.start, self.target.end
            );
            return Ok(PatternTable::empty(self.target.chr));
        }

        let selected = histogram
            .select(self.config.min_ctx_freq, &self.config.highlight);
        debug!(
            "Selected {} positions with frequency >= {}",
            selected.len(),
            self.config.min_ctx_freq
        );

        let extractor = PatternExtractor::new(
            &self.config.context,
            &selected,
            &self.config.highlight,
        );
        let mut rows = Vec::new();
        let mut anomalies = Vec::new();
        self.for_each_candidate(ScanPass::Extraction, |candidate| {
            let seq = self
                .store
                .sequence(candidate.read.templid)
                .unwrap_or_default();
            if let Some(row) = extractor.extract(&candidate, seq, &mut anomalies)
            {
                rows.push(row);
            }
        })?;

        if !anomalies.is_empty() {
            warn!(
                "{} context calls could not be encoded and were skipped",
                anomalies.len()
            );
        }
        let table = PatternTable::assemble(
            self.target.chr,
            rows,
            &selected,
            &self.config.highlight,
            histogram.candidate_reads(),
            anomalies,
        );
        info!(
            "Extracted {} patterns ({} unique) from {} candidate reads",
            table.len(),
            table.unique_patterns().len(),
            table.candidate_reads()
        );
        Ok(table)
    }

    /// First pass.
    fn select_positions(&self) -> Result<PositionHistogram, PatternError> {
        let mut histogram = PositionHistogram::new();
        self.for_each_candidate(ScanPass::Selection, |candidate| {
            histogram.observe(&candidate, &self.config.context)
        })?;
        Ok(histogram)
    }

    /// Visits the reads on the target chromosome passing the overlap filter,
    /// in input order.
    fn for_each_candidate<F>(
        &self,
        pass: ScanPass,
        mut visit: F,
    ) -> Result<(), PatternError>
    where
        F: FnMut(Candidate<'a>), {
        let reads: &'a ReadColumns = self.reads;
        for (index, read) in reads.iter().enumerate() {
            checkpoint(self.cancel.as_ref(), index, pass)?;
            if read.chr != self.target.chr {
                continue;
            }
            let calls = self.store.call_string(read.templid).ok_or(
                PatternError::TemplateOutOfRange {
                    read: index,
                    templid: read.templid,
                    n_templates: self.store.len(),
                },
            )?;
            if let Some(range) = self.target.scan_range(read.start, calls.len())
            {
                visit(Candidate {
                    index,
                    read,
                    calls,
                    range,
                    offset: self.target.strand_offset(read.strand),
                });
            }
        }
        Ok(())
    }
}

/// Extracts the patterns of `reads` over `target`.
pub fn extract_patterns<S: AsRef<[u8]>>(
    reads: &ReadColumns,
    store: TemplateStore<'_, S>,
    target: &TargetSpec,
    config: &PatternConfig,
) -> Result<PatternTable, PatternError> {
    PatternScan::new(reads, store, target, config).run()
}
