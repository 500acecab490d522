/// 1-based genomic coordinate.
pub type PosType = u32;
/// Chromosome identifier, as encoded by the caller.
pub type ChrIdType = u32;
/// Index into the template store.
pub type TemplateIdType = usize;
pub type CountType = u32;
pub type DensityType = f64;
