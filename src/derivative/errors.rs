//! Unified error handling for derivative and curvature operators.
//!
//! This module defines `DerivativeError`, the central error type for the
//! differentiation stack: invalid operation parameters (order, direction
//! pairs) and container failures bubbled up from the labeled-array layer.
//! An alias `DerivativeResult<T>` standardizes the return type across
//! operator code.
use crate::array::ArrayError;

/// Unified error type for derivative and curvature operators.
///
/// Covers invalid operation parameters and wrapped container errors.
/// Integrates with the array layer via `From<ArrayError>` and with
/// `anyhow::Error` via `From`, and provides readable diagnostics through
/// `Display`.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivativeError {
    // ---- Operation parameters ----
    /// Derivative order must be at least 1.
    InvalidOrder {
        order: usize,
    },

    /// The two curvature directions must name distinct axes.
    DegenerateDirections {
        axis: String,
    },

    /// Curvature needs at least two axes to default its directions.
    NotEnoughAxes {
        found: usize,
    },

    // ---- Container passthrough ----
    /// Failure from the labeled-array layer (axis lookup, spacing, shape).
    Array(ArrayError),

    // ---- Anyhow catchall ----
    Anyhow(String),

    // ---- Fallback ----
    UnknownError,
}

pub type DerivativeResult<T> = Result<T, DerivativeError>;

impl From<ArrayError> for DerivativeError {
    fn from(err: ArrayError) -> Self {
        DerivativeError::Array(err)
    }
}

impl From<anyhow::Error> for DerivativeError {
    fn from(err: anyhow::Error) -> Self {
        DerivativeError::Anyhow(err.to_string())
    }
}

impl std::fmt::Display for DerivativeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Operation parameters ----
            DerivativeError::InvalidOrder { order } => {
                write!(f, "Derivative Error: Order {} is invalid; at least 1 pass is required", order)
            }
            DerivativeError::DegenerateDirections { axis } => write!(
                f,
                "Derivative Error: Curvature directions must be distinct; '{}' given twice",
                axis
            ),
            DerivativeError::NotEnoughAxes { found } => write!(
                f,
                "Derivative Error: Curvature needs at least 2 axes; array has {}",
                found
            ),

            // ---- Container passthrough ----
            DerivativeError::Array(err) => write!(f, "Derivative Error: {}", err),

            // ---- Anyhow catchall ----
            DerivativeError::Anyhow(msg) => write!(f, "Derivative Error: {}", msg),

            // ---- Fallback ----
            DerivativeError::UnknownError => {
                write!(f, "Derivative Error: Unknown error occurred")
            }
        }
    }
}

impl std::error::Error for DerivativeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify that array-layer failures convert into the passthrough variant
    // and render both prefixes.
    //
    // Given
    // -----
    // - An `ArrayError::AxisNotFound` for "kz".
    //
    // Expect
    // ------
    // - Conversion yields `DerivativeError::Array` and the message carries
    //   both the derivative and array prefixes.
    fn array_errors_pass_through_with_context() {
        // Arrange
        let inner = ArrayError::AxisNotFound { axis: "kz".to_string() };

        // Act
        let err: DerivativeError = inner.clone().into();

        // Assert
        assert_eq!(err, DerivativeError::Array(inner));
        let msg = err.to_string();
        assert!(msg.starts_with("Derivative Error:"));
        assert!(msg.contains("Array Error:"));
        assert!(msg.contains("'kz'"));
    }
}
