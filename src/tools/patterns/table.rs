use std::collections::{
    BTreeMap,
    BTreeSet,
};

use hashbrown::HashMap;
use itertools::Itertools;
use once_cell::sync::Lazy;
use polars::prelude::*;

use crate::data_structs::context::{
    category_label,
    CategoryCode,
    CATEGORY_LEVELS,
};
use crate::data_structs::typedef::*;
use crate::data_structs::Strand;
use crate::error::PatternError;
use crate::getter_fn;
use crate::tools::patterns::extractor::{
    CallAnomaly,
    PatternRecord,
    PatternRow,
};
use crate::utils::get_categorical_dtype;

pub const CHR_NAME: &str = "seqnames";
pub const STRAND_NAME: &str = "strand";
pub const START_NAME: &str = "start";
pub const END_NAME: &str = "end";
pub const NBASE_NAME: &str = "nbase";
pub const BETA_NAME: &str = "beta";
pub const PATTERN_NAME: &str = "pattern";

/// Metadata columns, in output order.
pub const METADATA_COLUMNS: [&str; 7] = [
    CHR_NAME,
    STRAND_NAME,
    START_NAME,
    END_NAME,
    NBASE_NAME,
    BETA_NAME,
    PATTERN_NAME,
];

static STRAND_DTYPE: Lazy<DataType> =
    Lazy::new(|| get_categorical_dtype(&Strand::LEVELS));
static CATEGORY_DTYPE: Lazy<DataType> =
    Lazy::new(|| get_categorical_dtype(&CATEGORY_LEVELS));

/// Position-keyed table of the patterns found in one target window.
///
/// Every selected or highlighted position has a column holding one entry per
/// pattern; `None` marks patterns without a call (or base) at that position.
/// A table without patterns has no columns at all.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternTable {
    chr:             ChrIdType,
    patterns:        Vec<PatternRecord>,
    columns:         BTreeMap<PosType, Vec<Option<CategoryCode>>>,
    candidate_reads: usize,
    anomalies:       Vec<CallAnomaly>,
}

/// Occurrences of one distinct pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternCount {
    pub hash_id: String,
    pub count:   usize,
    pub nbase:   CountType,
    pub beta:    DensityType,
}

impl PatternTable {
    pub fn empty(chr: ChrIdType) -> Self {
        Self {
            chr,
            patterns: Vec::new(),
            columns: BTreeMap::new(),
            candidate_reads: 0,
            anomalies: Vec::new(),
        }
    }

    /// Merges the sparse pattern rows into dense per-position columns.
    pub(crate) fn assemble(
        chr: ChrIdType,
        rows: Vec<PatternRow>,
        selected: &BTreeSet<PosType>,
        highlight: &[PosType],
        candidate_reads: usize,
        anomalies: Vec<CallAnomaly>,
    ) -> Self {
        if rows.is_empty() {
            return Self {
                candidate_reads,
                anomalies,
                ..Self::empty(chr)
            };
        }

        let n_patterns = rows.len();
        let mut columns: BTreeMap<PosType, Vec<Option<CategoryCode>>> = selected
            .iter()
            .chain(highlight.iter())
            .map(|pos| (*pos, vec![None; n_patterns]))
            .collect();

        let mut patterns = Vec::with_capacity(n_patterns);
        for (row_idx, row) in rows.into_iter().enumerate() {
            for (pos, code) in row.calls.into_iter().chain(row.bases) {
                if let Some(column) = columns.get_mut(&pos) {
                    column[row_idx] = Some(code);
                }
            }
            patterns.push(row.record);
        }

        Self {
            chr,
            patterns,
            columns,
            candidate_reads,
            anomalies,
        }
    }

    getter_fn!(patterns, Vec<PatternRecord>);
    getter_fn!(columns, BTreeMap<PosType, Vec<Option<CategoryCode>>>);
    getter_fn!(anomalies, Vec<CallAnomaly>);

    pub fn chr(&self) -> ChrIdType {
        self.chr
    }

    /// Number of reads which passed the overlap filter.
    pub fn candidate_reads(&self) -> usize {
        self.candidate_reads
    }

    /// Number of patterns (rows).
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = PosType> + '_ {
        self.columns.keys().copied()
    }

    pub fn column(
        &self,
        pos: PosType,
    ) -> Option<&[Option<CategoryCode>]> {
        self.columns.get(&pos).map(Vec::as_slice)
    }

    /// Distinct patterns ordered by descending number of occurrences, then by
    /// hash id.
    pub fn unique_patterns(&self) -> Vec<PatternCount> {
        let mut counts: HashMap<u64, (usize, &PatternRecord)> = HashMap::new();
        for record in &self.patterns {
            counts.entry(record.hash).or_insert((0, record)).0 += 1;
        }
        counts
            .into_values()
            .map(|(count, record)| {
                PatternCount {
                    hash_id: record.hash_id(),
                    count,
                    nbase: record.nbase,
                    beta: record.beta,
                }
            })
            .sorted_by(|a, b| {
                b.count.cmp(&a.count).then_with(|| a.hash_id.cmp(&b.hash_id))
            })
            .collect()
    }

    /// Converts the table into a data frame with raw category codes.
    ///
    /// Strand is encoded as a nullable boolean (forward is `true`).
    pub fn to_df(&self) -> Result<DataFrame, PatternError> {
        if self.is_empty() {
            return Ok(DataFrame::empty());
        }
        let strand = self
            .patterns
            .iter()
            .map(|p| Option::<bool>::from(p.strand))
            .collect_vec();
        let mut columns = vec![
            Series::new(CHR_NAME.into(), vec![self.chr; self.len()]),
            Series::new(STRAND_NAME.into(), strand),
        ];
        columns.extend(self.record_series());
        columns.extend(self.columns.iter().map(|(pos, values)| {
            Series::new(pos.to_string().into(), values.as_slice())
        }));
        Ok(DataFrame::new(
            columns.into_iter().map(Column::from).collect(),
        )?)
    }

    /// Converts the table into a data frame with enum columns.
    ///
    /// `chr_levels` are the caller's chromosome labels, indexed by chromosome
    /// id. Position columns use [`CATEGORY_LEVELS`].
    pub fn to_labelled_df(
        &self,
        chr_levels: &[&str],
    ) -> Result<DataFrame, PatternError> {
        if self.is_empty() {
            return Ok(DataFrame::empty());
        }
        let chr_label = chr_levels
            .get(self.chr as usize)
            .ok_or(PatternError::UnknownChromosome(self.chr))?;
        let chr_dtype = get_categorical_dtype(chr_levels);

        let strand = self
            .patterns
            .iter()
            .map(|p| p.strand.to_string())
            .collect_vec();
        let mut columns = vec![
            Series::new(CHR_NAME.into(), vec![*chr_label; self.len()])
                .cast(&chr_dtype)?,
            Series::new(STRAND_NAME.into(), strand).cast(&STRAND_DTYPE)?,
        ];
        columns.extend(self.record_series());
        for (pos, values) in self.columns.iter() {
            let labels = values
                .iter()
                .map(|code| code.and_then(category_label))
                .collect_vec();
            columns.push(
                Series::new(pos.to_string().into(), labels)
                    .cast(&CATEGORY_DTYPE)?,
            );
        }
        Ok(DataFrame::new(
            columns.into_iter().map(Column::from).collect(),
        )?)
    }

    /// `start`, `end`, `nbase`, `beta` and `pattern` columns.
    fn record_series(&self) -> Vec<Series> {
        let (mut start, mut end, mut nbase, mut beta, mut pattern) = (
            Vec::with_capacity(self.len()),
            Vec::with_capacity(self.len()),
            Vec::with_capacity(self.len()),
            Vec::with_capacity(self.len()),
            Vec::with_capacity(self.len()),
        );
        for record in &self.patterns {
            start.push(record.start);
            end.push(record.end);
            nbase.push(record.nbase);
            beta.push(record.beta);
            pattern.push(record.hash_id());
        }
        vec![
            Series::new(START_NAME.into(), start),
            Series::new(END_NAME.into(), end),
            Series::new(NBASE_NAME.into(), nbase),
            Series::new(BETA_NAME.into(), beta),
            Series::new(PATTERN_NAME.into(), pattern),
        ]
    }
}
