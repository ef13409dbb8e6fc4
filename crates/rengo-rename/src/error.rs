use rengo_common::Pos;
use thiserror::Error;

/// Everything that can go wrong while renaming.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenameError {
    #[error("no declaration of `{name}` is visible at offset {pos}")]
    NotFound { name: String, pos: Pos },

    #[error("`{name}` is not a legal replacement identifier")]
    InvalidIdentifier { name: String },

    #[error("file index {index} is out of range for this package")]
    UnknownFile { index: usize },
}
