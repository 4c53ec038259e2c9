//! Error types for detpost.

use crate::postprocess::ArchitectureTag;
use thiserror::Error;

/// Result alias for detpost operations.
pub type Result<T> = std::result::Result<T, DetPostError>;

/// Broad classification of a [`DetPostError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The model configuration is unusable; raised before any decode work.
    Configuration,
    /// The supplied buffer disagrees with its declared shape or holds
    /// values that cannot be decoded.
    InputShape,
}

/// Errors that can occur while decoding model outputs.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DetPostError {
    /// The architecture tag has no decoder.
    #[error("unsupported architecture: {0}")]
    UnsupportedArchitecture(ArchitectureTag),
    /// The decoder needs a positive class count.
    #[error("invalid class count {num_classes} for {arch}")]
    InvalidClassCount {
        arch: ArchitectureTag,
        num_classes: usize,
    },
    /// A threshold is NaN or outside its range: `(0, 1]` for confidence, `[0, 1)` for IoU.
    #[error("invalid {name} threshold: {value}")]
    InvalidThreshold { name: &'static str, value: f32 },
    /// The buffer length does not match the declared shape.
    #[error("shape mismatch: expected {expected} values, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
    /// The output shape kind does not fit the architecture.
    #[error("unexpected output shape for {arch}: {reason}")]
    UnexpectedShape {
        arch: ArchitectureTag,
        reason: &'static str,
    },
    /// Width or height is zero or overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A class id field is negative or not finite.
    #[error("invalid class id {value} at row {row}")]
    InvalidClassId { row: usize, value: f32 },
    /// Every class score of a segmentation cell is NaN.
    #[error("no class score at cell {cell} is a number")]
    NanScores { cell: usize },
}

impl DetPostError {
    /// Returns the error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedArchitecture(_)
            | Self::InvalidClassCount { .. }
            | Self::InvalidThreshold { .. } => ErrorKind::Configuration,
            Self::ShapeMismatch { .. }
            | Self::UnexpectedShape { .. }
            | Self::InvalidDimensions { .. }
            | Self::InvalidClassId { .. }
            | Self::NanScores { .. } => ErrorKind::InputShape,
        }
    }

    /// Returns true for configuration errors.
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}
