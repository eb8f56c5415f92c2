//! derivative::curvature — regularized 2D anisotropic curvature.
//!
//! Purpose
//! -------
//! Compute the curvature field used to sharpen band features in ARPES
//! intensity maps: first and second partials along two chosen axes are
//! combined into a regularized curvature functional with an
//! axis-anisotropy correction, so that dispersive features stand out
//! against the smooth background.
//!
//! The functional is
//!
//! ```text
//! C(x,y) = [(1 + Cx·fx²)·Cy·fyy − 2·Cx·Cy·fx·fy·fxy + (1 + Cy·fy²)·Cx·fxx]
//!          / (1 + Cx·fx² + Cy·fy²)^(3/2)
//! ```
//!
//! with the anisotropy-corrected scale constants
//!
//! ```text
//! Cy = (dy/dx) · (|fx|max² + |fy|max²) · alpha
//! Cx = (dx/dy) · (|fx|max² + |fy|max²) · alpha
//! ```
//!
//! where `alpha` is a dimensionless regularization parameter, chosen
//! semi-universally.
//!
//! Key behaviors
//! -------------
//! - Default the direction pair to the array's first two axes; each
//!   direction's step comes from its own first two coordinate samples.
//! - When `beta` is supplied it overrides `alpha` on a log scale:
//!   `alpha = 10^beta`.
//! - The scale constants use the global maximum absolute value of each
//!   first-partial field over the entire array; they are normalization
//!   constants, not per-point quantities, and are fixed before the
//!   pointwise combine.
//! - The mixed partial is one-sided: the gradient of `df/dx` along y, never
//!   symmetrized by default. This is a known accuracy tradeoff of the
//!   analysis code this crate reproduces and is kept as the contract;
//!   `symmetric_mixed: true` opts into averaging the two orderings.
//! - NaNs in the two first-partial buffers are zeroed before anything else
//!   is derived from them; the combined field is returned as computed, with
//!   inf/NaN cells passed through unclipped (downstream code treats them as
//!   flat-region sentinels).
//!
//! Invariants & assumptions
//! ------------------------
//! - Both direction axes have at least 2 samples; shorter axes fail at the
//!   spacing computation.
//! - The input array is never mutated; the result shares its shape,
//!   coordinates, and axis order.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the beta override, default directions, the closed-form
//!   center value for a paraboloid, approximate axis-swap symmetry on
//!   isotropic data, alpha contrast suppression, non-finite pass-through,
//!   and the typed direction failures.
use crate::array::LabeledArray;
use crate::derivative::errors::{DerivativeError, DerivativeResult};
use crate::derivative::gradient::{gradient_values, zero_nans};
use crate::provenance::{record_if_tracked, ProvenanceRecord, ProvenanceSink};
use ndarray::{Axis, Zip};
use serde_json::json;

/// Configuration for [`curvature`].
#[derive(Debug, Clone)]
pub struct CurvatureOptions {
    /// Ordered pair of distinct axis names. `None` uses the array's first
    /// two axes.
    pub directions: Option<(String, String)>,
    /// Dimensionless regularization parameter.
    pub alpha: f64,
    /// Log-scale override: when set, `alpha = 10^beta` and the `alpha`
    /// field is ignored.
    pub beta: Option<f64>,
    /// Average the two mixed-partial orderings instead of the one-sided
    /// default.
    pub symmetric_mixed: bool,
}

impl Default for CurvatureOptions {
    fn default() -> Self {
        CurvatureOptions { directions: None, alpha: 1.0, beta: None, symmetric_mixed: false }
    }
}

impl CurvatureOptions {
    /// Options for an explicit direction pair at the default regularization.
    pub fn between(x: impl Into<String>, y: impl Into<String>) -> Self {
        CurvatureOptions { directions: Some((x.into(), y.into())), ..Self::default() }
    }

    /// Replace the regularization parameter, for chained construction.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Regularized anisotropic curvature of `arr` over two axes.
///
/// # Arguments
/// - `arr`: the labeled array to transform. Read-only.
/// - `opts`: direction pair, regularization (`alpha`/`beta`), and the
///   mixed-partial policy.
/// - `sink`: optional provenance sink; `None` uses the attrs-history
///   default. Recording happens only for identity-tracked sources.
///
/// # Returns
/// A new [`LabeledArray`] of identical shape and coordinates holding the
/// curvature field. Singular cells come back as IEEE inf/NaN, unmodified.
///
/// # Errors
/// - [`DerivativeError::NotEnoughAxes`] when directions are defaulted on an
///   array with fewer than two axes.
/// - [`DerivativeError::DegenerateDirections`] when both directions name
///   the same axis.
/// - [`DerivativeError::Array`] wrapping axis lookup or spacing failures.
pub fn curvature(
    arr: &LabeledArray,
    opts: &CurvatureOptions,
    sink: Option<&mut dyn ProvenanceSink>,
) -> DerivativeResult<LabeledArray> {
    let alpha = match opts.beta {
        Some(beta) => 10f64.powf(beta),
        None => opts.alpha,
    };

    let (x_axis, y_axis) = match &opts.directions {
        Some((x, y)) => (x.clone(), y.clone()),
        None => {
            let names = arr.axis_names();
            if names.len() < 2 {
                return Err(DerivativeError::NotEnoughAxes { found: names.len() });
            }
            (names[0].to_string(), names[1].to_string())
        }
    };
    if x_axis == y_axis {
        return Err(DerivativeError::DegenerateDirections { axis: x_axis });
    }

    let ix = Axis(arr.axis_index(&x_axis)?);
    let iy = Axis(arr.axis_index(&y_axis)?);
    let dx = arr.spacing(&x_axis)?;
    let dy = arr.spacing(&y_axis)?;

    // First partials over both directions, NaN-scrubbed before anything is
    // derived from them.
    let values = arr.values().view();
    let mut dfx = gradient_values(&values, dx, ix);
    let mut dfy = gradient_values(&values, dy, iy);
    zero_nans(&mut dfx);
    zero_nans(&mut dfy);

    // Global normalization constants: fixed from the whole-array gradient
    // maxima before the pointwise combine.
    let mdfdx = dfx.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    let mdfdy = dfy.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    let scale = mdfdx * mdfdx + mdfdy * mdfdy;
    let cy = (dy / dx) * scale * alpha;
    let cx = (dx / dy) * scale * alpha;

    // Second partials. The mixed partial is one-sided by contract.
    let d2fy = gradient_values(&dfy.view(), dy, iy);
    let d2fx = gradient_values(&dfx.view(), dx, ix);
    let mut d2fxy = gradient_values(&dfx.view(), dy, iy);
    if opts.symmetric_mixed {
        let d2fyx = gradient_values(&dfy.view(), dx, ix);
        Zip::from(&mut d2fxy).and(&d2fyx).for_each(|a, &b| *a = 0.5 * (*a + b));
    }

    let mut curv = dfx.clone();
    Zip::from(&mut curv)
        .and(&dfx)
        .and(&dfy)
        .and(&d2fx)
        .and(&d2fy)
        .and(&d2fxy)
        .for_each(|out, &fx, &fy, &fxx, &fyy, &fxy| {
            let fx2 = fx * fx;
            let fy2 = fy * fy;
            let numerator = (1.0 + cx * fx2) * cy * fyy - 2.0 * cx * cy * fx * fy * fxy
                + (1.0 + cy * fy2) * cx * fxx;
            let denom = (1.0 + cx * fx2 + cy * fy2).powf(1.5);
            *out = numerator / denom;
        });

    let mut derived = arr.with_values(curv);
    let record = ProvenanceRecord::new("Curvature", "curvature")
        .with_param("directions", json!([x_axis, y_axis]))
        .with_param("alpha", json!(alpha));
    record_if_tracked(&mut derived, arr, record, sink);

    Ok(derived)
}
