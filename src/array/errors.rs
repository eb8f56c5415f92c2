//! Unified error handling for the labeled-array container.
//!
//! This module defines `ArrayError`, the central error type for axis lookup,
//! construction validation, and coordinate-spacing preconditions on
//! [`LabeledArray`](crate::array::LabeledArray). It groups domain-specific
//! failures (missing axes, malformed coordinate vectors) with catch-all and
//! fallback variants. An alias `ArrayResult<T>` standardizes the return type
//! across container code.

/// Unified error type for labeled-array operations.
///
/// Covers axis-lookup failures, construction-time shape/coordinate
/// mismatches, and spacing preconditions. Designed to integrate seamlessly
/// with `anyhow::Error` via `From`, and to provide readable diagnostics
/// through `Display`.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayError {
    // ---- Axis lookup ----
    /// No axis with the requested name exists on the array.
    AxisNotFound {
        axis: String,
    },

    // ---- Construction validation ----
    /// Number of axis descriptors does not match the buffer dimensionality.
    AxisCountMismatch {
        axes: usize,
        ndim: usize,
    },

    /// Coordinate vector length does not match the axis length of the buffer.
    CoordLengthMismatch {
        axis: String,
        coords: usize,
        len: usize,
    },

    /// Two axes share the same name.
    DuplicateAxis {
        axis: String,
    },

    // ---- Spacing preconditions ----
    /// Axis has fewer than two coordinate samples, so no step can be derived.
    AxisTooShort {
        axis: String,
        len: usize,
    },

    // ---- Anyhow catchall ----
    Anyhow(String),

    // ---- Fallback ----
    UnknownError,
}

pub type ArrayResult<T> = Result<T, ArrayError>;

impl From<anyhow::Error> for ArrayError {
    fn from(err: anyhow::Error) -> Self {
        ArrayError::Anyhow(err.to_string())
    }
}

impl std::fmt::Display for ArrayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Axis lookup ----
            ArrayError::AxisNotFound { axis } => {
                write!(f, "Array Error: Axis '{}' not found on the array", axis)
            }

            // ---- Construction validation ----
            ArrayError::AxisCountMismatch { axes, ndim } => write!(
                f,
                "Array Error: {} axis descriptors supplied for a {}-dimensional buffer",
                axes, ndim
            ),
            ArrayError::CoordLengthMismatch { axis, coords, len } => write!(
                f,
                "Array Error: Axis '{}' carries {} coordinates for {} samples",
                axis, coords, len
            ),
            ArrayError::DuplicateAxis { axis } => {
                write!(f, "Array Error: Axis name '{}' appears more than once", axis)
            }

            // ---- Spacing preconditions ----
            ArrayError::AxisTooShort { axis, len } => write!(
                f,
                "Array Error: Axis '{}' has {} sample(s); at least 2 are needed to derive a step",
                axis, len
            ),

            // ---- Anyhow catchall ----
            ArrayError::Anyhow(msg) => write!(f, "Array Error: {}", msg),

            // ---- Fallback ----
            ArrayError::UnknownError => write!(f, "Array Error: Unknown error occurred"),
        }
    }
}

impl std::error::Error for ArrayError {}
