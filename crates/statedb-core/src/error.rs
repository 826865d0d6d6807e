//! Error types for StateDB Core.

use thiserror::Error;

/// A write that cannot land in the existing tree without destroying data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("cannot address key {key:?} inside an array")]
    KeyInArray { key: String },

    #[error("index {index} is too far past the end of an array of length {len}")]
    IndexTooFar { index: usize, len: usize },
}
