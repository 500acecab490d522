pub use crate::data_structs::context::{
    CategoryCode,
    ContextSet,
    CATEGORY_LEVELS,
};
pub use crate::data_structs::read::{
    Read,
    ReadColumns,
};
pub use crate::data_structs::target::{
    ScanRange,
    TargetSpec,
};
pub use crate::data_structs::template_store::TemplateStore;
pub use crate::data_structs::typedef::*;
pub use crate::data_structs::Strand;
pub use crate::error::PatternError;
pub use crate::tools::patterns::{
    extract_patterns,
    CallAnomaly,
    PatternConfig,
    PatternCount,
    PatternRecord,
    PatternScan,
    PatternTable,
};
pub use crate::utils::CancelToken;
