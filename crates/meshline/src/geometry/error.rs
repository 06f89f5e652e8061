use std::fmt;

/// Why a point set was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidInputKind {
    /// The container could not be read as a sequence of 2- or 3-component points.
    UnrecognizedShape(String),
    /// The path has fewer than two points.
    TooFewPoints { count: usize },
}

/// A point set handed to `set_points` / `set_geometry` was rejected.
///
/// The geometry keeps the state it had before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidInputError {
    pub kind: InvalidInputKind,
}

impl InvalidInputError {
    pub(crate) fn unrecognized(detail: impl Into<String>) -> Self {
        Self { kind: InvalidInputKind::UnrecognizedShape(detail.into()) }
    }

    pub(crate) fn too_few_points(count: usize) -> Self {
        Self { kind: InvalidInputKind::TooFewPoints { count } }
    }
}

impl fmt::Display for InvalidInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            InvalidInputKind::UnrecognizedShape(detail) => {
                write!(f, "invalid mesh line input: unrecognized point container ({detail})")
            }
            InvalidInputKind::TooFewPoints { count } => {
                write!(f, "invalid mesh line input: need at least 2 points, got {count}")
            }
        }
    }
}

impl std::error::Error for InvalidInputError {}

/// `advance` was called before any path was processed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AdvanceError {
    NotProcessed,
}

impl fmt::Display for AdvanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvanceError::NotProcessed => {
                write!(f, "cannot advance a mesh line before its points have been set")
            }
        }
    }
}

impl std::error::Error for AdvanceError {}
