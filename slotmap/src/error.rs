//! Lookup failures

use thiserror::Error;

/// Why a [`Key`](crate::Key) could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The key's slot index is past the end of the slot table
    #[error("key index {index} is out of bounds for a slot table of {slots} slots")]
    OutOfBounds {
        /// the key's slot index
        index: usize,
        /// the number of slots in the map, including the reserved slot 0
        slots: usize,
    },
    /// The key's slot was vacated (and maybe reused) since the key was issued
    #[error("key index {index} refers to a stale generation")]
    Stale {
        /// the key's slot index
        index: usize,
    },
}

impl KeyError {
    /// The slot index of the key that failed
    pub fn index(&self) -> usize {
        match *self {
            Self::OutOfBounds { index, .. } | Self::Stale { index } => index,
        }
    }
}
