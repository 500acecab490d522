//! # bsxpatterns
//!
//! `bsxpatterns` extracts distinct per-read methylation patterns from
//! bisulfite sequencing reads overlapping a genomic target window. Every read
//! is reduced to the vector of methylation calls it carries at frequently
//! observed context positions, identified by a deterministic FNV-1a content
//! hash, and summarized by its methylation level (beta value). Raw bases at
//! caller-selected coordinates can be attached to every pattern.
//!
//! The extraction is a two-pass scan over an immutable snapshot of reads:
//!
//! 1. a histogram of in-context positions over all reads that overlap the
//!    target decides which positions are reported,
//! 2. a second scan builds one pattern row per read restricted to those
//!    positions.
//!
//! The result is a [`PatternTable`], which can be rendered into a
//! `polars::DataFrame` either with raw category codes or with categorical
//! labels.
//!
//! ## Structure
//!
//! * [`data_structs`]: reads, the borrowed template store, target window with
//!   the overlap filter, context set and category code tables.
//! * [`tools`]: the pattern extraction passes and the table assembler.
//! * [`utils`]: builder macros, cancellation token and polars helpers.
//! * [`error`]: the crate error type.
//!
//! ## Usage
//!
//! ```
//! use bsxpatterns::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let calls = vec![b"ZzH".to_vec(), b"zZH".to_vec()];
//!     let seqs = vec![b"CCA".to_vec(), b"CCA".to_vec()];
//!     let store = TemplateStore::try_new(&calls, &seqs)?;
//!
//!     let reads = ReadColumns::try_from_columns(
//!         vec![1, 1],
//!         vec![Strand::Forward, Strand::Forward],
//!         vec![100, 100],
//!         vec![0, 1],
//!     )?;
//!     let target = TargetSpec::new(1, 100, 102);
//!     let config = PatternConfig::default()
//!         .with_context(ContextSet::from("zZ"))
//!         .with_min_ctx_freq(0.0);
//!
//!     let table = PatternScan::new(&reads, store, &target, &config).run()?;
//!     assert_eq!(table.len(), 2);
//!
//!     let df = table.to_df()?;
//!     println!("{df}");
//!     Ok(())
//! }
//! ```

pub mod data_structs;
pub mod error;
pub mod exports;
pub mod prelude;
pub mod tools;
pub mod utils;

pub use crate::data_structs::context::ContextSet;
pub use crate::data_structs::read::{
    Read,
    ReadColumns,
};
pub use crate::data_structs::target::{
    ScanRange,
    TargetSpec,
};
pub use crate::data_structs::template_store::TemplateStore;
pub use crate::data_structs::Strand;
pub use crate::error::PatternError;
pub use crate::tools::patterns::{
    extract_patterns,
    PatternConfig,
    PatternScan,
    PatternTable,
};
pub use crate::utils::CancelToken;
