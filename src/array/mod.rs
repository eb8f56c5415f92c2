//! array — labeled N-dimensional container and its errors.
//!
//! Purpose
//! -------
//! Bundle the [`LabeledArray`] container (N-d `f64` buffer with named
//! coordinate axes and a JSON attribute map) together with its error surface
//! under a single namespace. This is the data type every operator in the
//! crate consumes and produces.
//!
//! Conventions
//! -----------
//! - Axis descriptors are stored in dimension order and looked up by name.
//! - Errors surface as [`ArrayError`] via the [`ArrayResult`] alias.

pub mod errors;
pub mod labeled;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{ArrayError, ArrayResult};
pub use self::labeled::{AxisCoords, LabeledArray};
