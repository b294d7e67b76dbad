//! Memory reference classification.
//!
//! Every trace record names which first-level cache it is directed at. The kind
//! selects the entry point of the hierarchy; it never changes what the shared L2
//! does with the request.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of memory reference presented to the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    /// Instruction fetch, served by the instruction cache.
    Instruction,
    /// Data load or store, served by the data cache.
    Data,
}

impl AccessKind {
    /// Parses the single-letter kind used in trace files.
    ///
    /// `I` is an instruction fetch; `D`, `L` and `S` are data references.
    /// Matching is case-insensitive.
    pub const fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'I' => Some(Self::Instruction),
            'D' | 'L' | 'S' => Some(Self::Data),
            _ => None,
        }
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instruction => write!(f, "I"),
            Self::Data => write!(f, "D"),
        }
    }
}
