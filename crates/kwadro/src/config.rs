#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Board behaviour switches.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// Start from an empty document in [`Board::open`](crate::Board::open) even
    /// when the file already exists.
    pub force_new: bool,
    /// Reject filters naming attributes outside the schema with
    /// `UnknownColumn`. When off, such conditions never match.
    pub strict_filters: bool,
}

impl BoardConfig {
    /// Ignore any existing file on open.
    pub fn fresh() -> Self {
        Self {
            force_new: true,
            ..Self::default()
        }
    }

    /// Treat unknown filter attributes as non-matching instead of failing.
    pub fn lenient() -> Self {
        Self {
            strict_filters: false,
            ..Self::default()
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            force_new: false,
            strict_filters: true,
        }
    }
}
