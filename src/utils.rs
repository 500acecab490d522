//! Utility functions and helper macros used throughout the crate.
//!
//! - Macros for common struct operations (getter functions, builder-style
//!   `with_*` methods).
//! - [`CancelToken`] for cooperative cancellation of long scans.
//! - Creation of categorical polars data types from label lists.

use std::sync::atomic::{
    AtomicBool,
    Ordering,
};
use std::sync::Arc;

use polars::prelude::*;
use polars_arrow::array::Utf8ViewArray;

use crate::error::{
    PatternError,
    ScanPass,
};

/// Number of reads between two cancellation checkpoints.
pub const CANCEL_CHECK_INTERVAL: usize = 1 << 16;

#[macro_export]
macro_rules! getter_fn {
    ($field_name: ident, $field_type: ty) => {
        pub fn $field_name(&self) -> &$field_type {
            &self.$field_name
        }
    };
}
pub use getter_fn;

#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        paste::paste! {
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
                self.$field_name = value;
                self
            }
        }
    };
}
pub use with_field_fn;

/// Creates an enum data type from a list of categories.
pub fn get_categorical_dtype(categories: &[&str]) -> DataType {
    let categories = Utf8ViewArray::from_slice(
        categories
            .iter()
            .map(|c| Some(*c))
            .collect::<Vec<_>>()
            .as_slice(),
    );
    let rev_mapping = Arc::new(RevMapping::build_local(categories));
    DataType::Enum(Some(rev_mapping), CategoricalOrdering::Physical)
}

/// Shared flag used to request cancellation of a running scan.
///
/// Clones share the same flag. The scan only observes the flag at
/// checkpoints, every [`CANCEL_CHECK_INTERVAL`] reads.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Cancellation checkpoint. Evaluated for read indices that are multiples of
/// [`CANCEL_CHECK_INTERVAL`].
#[inline]
pub(crate) fn checkpoint(
    token: Option<&CancelToken>,
    read_idx: usize,
    pass: ScanPass,
) -> Result<(), PatternError> {
    if read_idx % CANCEL_CHECK_INTERVAL != 0 {
        return Ok(());
    }
    match token {
        Some(token) if token.is_cancelled() => {
            Err(PatternError::Aborted {
                pass,
                reads_scanned: read_idx,
            })
        },
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_cadence() {
        let token = CancelToken::new();
        token.cancel();
        let cancelled = Some(&token);

        assert!(checkpoint(cancelled, CANCEL_CHECK_INTERVAL - 1, ScanPass::Extraction).is_ok());
        assert!(checkpoint(cancelled, 1, ScanPass::Selection).is_ok());
        assert!(matches!(
            checkpoint(cancelled, CANCEL_CHECK_INTERVAL, ScanPass::Extraction),
            Err(PatternError::Aborted {
                pass:          ScanPass::Extraction,
                reads_scanned: 65_536,
            })
        ));
        assert!(matches!(
            checkpoint(cancelled, 2 * CANCEL_CHECK_INTERVAL, ScanPass::Selection),
            Err(PatternError::Aborted {
                pass:          ScanPass::Selection,
                reads_scanned: 131_072,
            })
        ));
    }

    #[test]
    fn test_checkpoint_without_cancellation() {
        let token = CancelToken::new();
        assert!(checkpoint(None, 0, ScanPass::Selection).is_ok());
        assert!(checkpoint(None, CANCEL_CHECK_INTERVAL, ScanPass::Extraction).is_ok());
        assert!(checkpoint(Some(&token), CANCEL_CHECK_INTERVAL, ScanPass::Extraction).is_ok());

        let shared = token.clone();
        shared.cancel();
        assert!(token.is_cancelled());
        assert!(checkpoint(Some(&token), 0, ScanPass::Extraction).is_err());
    }
}
