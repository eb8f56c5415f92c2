//! derivative — coordinate-aware differentiation and curvature operators.
//!
//! Purpose
//! -------
//! Bundle the differentiation stack under one namespace: the fixed-spacing
//! axis gradient ([`gradient`]), the repeated/smoothed derivative chain
//! ([`dn_along_axis`] and its order-1/order-2 wrappers), and the regularized
//! anisotropic curvature functional ([`curvature`]). All three consume and
//! produce [`LabeledArray`](crate::array::LabeledArray) values and share the
//! same stencil kernel.
//!
//! Key behaviors
//! -------------
//! - Axis steps always come from the first two coordinate samples of the
//!   differentiated axis (constant-step assumption; non-uniform grids are a
//!   documented limitation).
//! - Derived arrays share shape, coordinates, and axis order with their
//!   source; only values and the copied attribute map change.
//! - Provenance is recorded through the
//!   [`provenance`](crate::provenance) capability, conditionally on the
//!   source being identity-tracked.
//!
//! Conventions
//! -----------
//! - Errors surface as [`DerivativeError`] via [`DerivativeResult`];
//!   container failures arrive wrapped from the array layer.
//! - Configuration travels on per-call options structs ([`DnOptions`],
//!   [`CurvatureOptions`]); there is no shared mutable state.
//!
//! Testing notes
//! -------------
//! - Each operator file carries its own unit tests; the crate-level
//!   integration test exercises the full paraboloid pipeline.

pub mod chain;
pub mod curvature;
pub mod errors;
pub mod gradient;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::chain::{
    d1_along_axis, d2_along_axis, dn_along_axis, DnOptions, SmoothFn, DEFAULT_AXIS_PREFERENCE,
};
pub use self::curvature::{curvature, CurvatureOptions};
pub use self::errors::{DerivativeError, DerivativeResult};
pub use self::gradient::gradient;
