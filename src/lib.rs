//! arpes_curvature — differentiation and curvature operators for ARPES spectra.
//!
//! Purpose
//! -------
//! Provide coordinate-aware finite-difference differentiation and a
//! regularized 2D anisotropic curvature functional over labeled
//! multi-dimensional arrays, the way they are applied to angle-resolved
//! photoemission (ARPES) intensity maps: derivatives are taken along named
//! physical axes (energy, momentum, angle), with the axis step inferred from
//! the axis's own coordinate vector, and every derived array can carry a
//! lineage record describing how it was produced.
//!
//! Key behaviors
//! -------------
//! - Represent spectra as [`array::LabeledArray`]: an N-d `f64` buffer with
//!   one named coordinate axis per dimension and a JSON attribute map.
//! - Differentiate along a named axis with [`derivative::gradient`]
//!   (central differences, one-sided at the boundaries, fixed axis step).
//! - Take repeated, optionally smoothed derivatives with
//!   [`derivative::dn_along_axis`] and its order-1/order-2 wrappers.
//! - Compute the regularized curvature field with [`derivative::curvature`].
//! - Record provenance through the [`provenance::ProvenanceSink`] capability,
//!   conditionally on the source array being identity-tracked.
//!
//! Invariants & assumptions
//! ------------------------
//! - Axis coordinates are assumed monotonically increasing with near-uniform
//!   spacing; the step is always taken from the first two samples and applied
//!   across the whole axis. Non-uniform grids are not handled.
//! - Operators never mutate their input: a new array is returned, sharing
//!   coordinates and axis order with the source, with only the cell values
//!   and the attribute map replaced.
//! - Numeric singularities (zero curvature denominator) propagate as IEEE
//!   inf/NaN values in the output; they are never clipped or raised.
//!
//! Conventions
//! -----------
//! - All numeric work uses `ndarray` containers over `f64`.
//! - Errors are surfaced through per-area enums ([`array::ArrayError`],
//!   [`derivative::DerivativeError`]) and their `Result` aliases; the only
//!   logging is a `log::warn!` on the default-axis fallback path.
//! - Configuration is explicit: axis preferences and regularization controls
//!   live on per-call options structs, never in shared mutable state.
//!
//! Downstream usage
//! ----------------
//! - Load or construct a [`array::LabeledArray`], then call the operators in
//!   [`derivative`]; pass a [`provenance::ProvenanceSink`] when lineage
//!   should be routed somewhere other than the derived array's attributes.

pub mod array;
pub mod derivative;
pub mod provenance;

pub use crate::array::{ArrayError, ArrayResult, AxisCoords, LabeledArray};
pub use crate::derivative::{
    curvature, d1_along_axis, d2_along_axis, dn_along_axis, gradient, CurvatureOptions,
    DerivativeError, DerivativeResult, DnOptions,
};
pub use crate::provenance::{record_if_tracked, AttrHistorySink, ProvenanceRecord, ProvenanceSink};
