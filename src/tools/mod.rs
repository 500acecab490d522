//! Analysis tools built on top of [`data_structs`](crate::data_structs).
//!
//! - [`patterns`]: extraction of per-read methylation patterns over a target
//!   window. It selects frequently observed context positions, encodes and
//!   hashes the calls of each read and assembles the position-keyed pattern
//!   table.
pub mod patterns;
