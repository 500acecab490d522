//! Context set and category code tables.
//!
//! Methylation calls and highlighted bases are stored as small integer codes.
//! A code `c` is a 1-based index into [`CATEGORY_LEVELS`], so the label of a
//! code is `CATEGORY_LEVELS[c - 1]`. Codes are part of the output contract and
//! must stay bit-exact:
//!
//! | byte | code | label |  | byte | code | label |
//! |------|------|-------|--|------|------|-------|
//! | `H`  | 2    | H     |  | `h`  | 10   | h     |
//! | `X`  | 6    | X     |  | `x`  | 14   | x     |
//! | `Z`  | 7    | Z     |  | `z`  | 15   | z     |
//! | `A`  | 3    | A     |  | `T`  | 11   | T     |
//! | `C`  | 4    | C     |  | `G`  | 12   | G     |
//!
//! Upper-case calls (methylated) have bit `8` of the code clear.

use std::fmt::Display;

use serde::{
    Deserialize,
    Serialize,
};

pub type CategoryCode = u8;

/// Labels of the category codes. Code `c` is labelled `CATEGORY_LEVELS[c -
/// 1]`.
pub const CATEGORY_LEVELS: [&str; 16] = [
    "NA1", "H", "A", "C", "NA5", "X", "Z", "NA8", "NA9", "h", "T", "G", "NA13",
    "x", "z", "NA16",
];

/// Codes of the A, C, T and G bases, indexed by `(byte >> 1) & 3`.
const BASE_CODES: [CategoryCode; 4] = [3, 4, 11, 12];
const UNMETHYLATED_FLAG: CategoryCode = 8;

/// Encodes a methylation call byte.
#[inline]
pub fn call_code(byte: u8) -> CategoryCode {
    (((byte as u16 + 2) >> 2) & 15) as CategoryCode
}

/// Encodes a sequence byte. Only upper-case A, C, G and T are encoded.
#[inline]
pub fn base_code(byte: u8) -> Option<CategoryCode> {
    match byte {
        b'A' | b'C' | b'G' | b'T' => Some(BASE_CODES[((byte >> 1) & 3) as usize]),
        _ => None,
    }
}

#[inline]
pub fn is_methylated(code: CategoryCode) -> bool {
    code & UNMETHYLATED_FLAG == 0
}

/// Returns the label of a code, or `None` for code 0 and codes above 16.
pub fn category_label(code: CategoryCode) -> Option<&'static str> {
    (code as usize)
        .checked_sub(1)
        .and_then(|idx| CATEGORY_LEVELS.get(idx))
        .copied()
}

/// Returns true if the code does not correspond to a known call or base.
pub fn is_na_code(code: CategoryCode) -> bool {
    category_label(code)
        .map(|label| label.starts_with("NA"))
        .unwrap_or(true)
}

/// Set of call characters considered "in context".
#[derive(Clone, PartialEq, Eq)]
pub struct ContextSet {
    chars:  Vec<u8>,
    lookup: [bool; 256],
}

impl ContextSet {
    pub fn new(chars: &[u8]) -> Self {
        let mut lookup = [false; 256];
        let mut unique = Vec::with_capacity(chars.len());
        for &c in chars {
            if !lookup[c as usize] {
                lookup[c as usize] = true;
                unique.push(c);
            }
        }
        Self {
            chars: unique,
            lookup,
        }
    }

    #[inline]
    pub fn contains(
        &self,
        byte: u8,
    ) -> bool {
        self.lookup[byte as usize]
    }

    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Characters of the set whose call code has no valid label.
    pub fn unencodable_chars(&self) -> Vec<u8> {
        self.chars
            .iter()
            .copied()
            .filter(|c| is_na_code(call_code(*c)))
            .collect()
    }
}

impl Default for ContextSet {
    /// CpG context.
    fn default() -> Self {
        Self::from("zZ")
    }
}

impl From<&str> for ContextSet {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl Display for ContextSet {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.chars))
    }
}

impl std::fmt::Debug for ContextSet {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_tuple("ContextSet")
            .field(&self.to_string())
            .finish()
    }
}

impl Serialize for ContextSet {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ContextSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        Ok(ContextSet::from(s.as_str()))
    }
}
