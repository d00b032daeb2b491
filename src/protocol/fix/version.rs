//! # FIX Version
//!
//! Protocol version identifiers with forgiving parsing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported FIX protocol versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FixVersion {
    /// FIX 4.0.
    Fix40,
    /// FIX 4.2.
    Fix42,
    /// FIX 4.4.
    #[default]
    Fix44,
    /// FIX 5.0 (FIXT.1.1 transport).
    Fix50,
}

impl FixVersion {
    /// Returns the BeginString (8) value for this version.
    #[must_use]
    pub const fn begin_string(self) -> &'static str {
        match self {
            Self::Fix40 => "FIX.4.0",
            Self::Fix42 => "FIX.4.2",
            Self::Fix44 => "FIX.4.4",
            Self::Fix50 => "FIXT.1.1",
        }
    }

    /// Resolves a version from a configuration string.
    ///
    /// Accepts both compact ("FIX44") and dotted ("FIX.4.4") spellings,
    /// case-insensitively. Unknown or empty input resolves to FIX 4.4.
    #[must_use]
    pub fn resolve(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "FIX40" | "FIX.4.0" => Self::Fix40,
            "FIX42" | "FIX.4.2" => Self::Fix42,
            "FIX50" | "FIXT.1.1" | "FIX.5.0" => Self::Fix50,
            _ => Self::Fix44,
        }
    }
}

impl fmt::Display for FixVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.begin_string())
    }
}
