//! Error type for pose tree operations that can fail at runtime.
//!
//! Programmer errors go through [`crate::verify`]; this type covers the
//! operations whose failure a caller is expected to handle.

use thiserror::Error;

use crate::pose::PoseOriginId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoseGraphError {
    #[error("pose origin {0} is not registered")]
    UnknownOrigin(PoseOriginId),

    #[error("pose origin {0} is not a root")]
    OriginNotRoot(PoseOriginId),

    #[error("pose origin {0} is already the current origin")]
    AlreadyCurrent(PoseOriginId),

    #[error("invalid pose snapshot: {0}")]
    InvalidSnapshot(String),
}

pub type Result<T> = std::result::Result<T, PoseGraphError>;
