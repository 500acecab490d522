//! Core data structures of the pattern extraction.
//!
//! - [`read`]: aligned reads ([`Read`](read::Read)) and their column-oriented
//!   collection ([`ReadColumns`](read::ReadColumns)).
//! - [`template_store`]: borrowed handle over the per-template call strings and
//!   sequences.
//! - [`target`]: the target window and the overlap filter deciding which part
//!   of a read gets scanned.
//! - [`context`]: the set of call characters considered "in context" and the
//!   category code tables used to encode calls and bases.
//! - [`typedef`]: type aliases for positions, counts and identifiers.

pub mod context;
mod enums;
pub mod read;
pub mod target;
pub mod template_store;
pub mod typedef;


pub use enums::Strand;
