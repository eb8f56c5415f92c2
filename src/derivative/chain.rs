//! derivative::chain — repeated, optionally smoothed derivatives along one axis.
//!
//! Purpose
//! -------
//! Provide `dn_along_axis`: N sequential gradient passes along a single
//! named axis, with an optional smoothing hook applied before each pass and
//! a domain-specific default when no axis is named. Order-1 and order-2
//! wrappers cover the common cases.
//!
//! Key behaviors
//! -------------
//! - Resolve a missing axis by scanning an explicit preference list of
//!   canonical ARPES axis names, falling back to the array's first axis with
//!   a non-fatal warning when nothing matches.
//! - By default, every pass smooths and differentiates the ORIGINAL array
//!   values; the last pass's output is returned. For identity smoothing the
//!   result of any order therefore equals a single gradient pass. This
//!   mirrors the long-standing behavior of the analysis code this crate
//!   reproduces and is deliberately kept as the contract.
//! - `chained: true` opts into the compose-N variant, feeding each pass the
//!   previous pass's output (a true Nth derivative).
//! - Record provenance as `{what: "<order>th derivative", by:
//!   "dn_along_axis", axis, order}` under the conditional tracking rule.
//!
//! Invariants & assumptions
//! ------------------------
//! - `order >= 1`; order 0 is rejected up front.
//! - The axis step is fixed once from the first two coordinate samples and
//!   reused for every pass.
//! - The smoothing hook receives a buffer it does not own and returns a new
//!   buffer of the same shape; the source array is never mutated.
//!
//! Conventions
//! -----------
//! - Configuration travels on [`DnOptions`]; the preference list is a plain
//!   per-call value, never shared mutable state.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the re-smoothing quirk (default), the chained variant,
//!   axis preference and fallback, smoothing pass-through, the order guard,
//!   and conditional provenance.
use crate::array::LabeledArray;
use crate::derivative::errors::{DerivativeError, DerivativeResult};
use crate::derivative::gradient::{gradient_values, zero_nans};
use crate::provenance::{record_if_tracked, ProvenanceRecord, ProvenanceSink};
use ndarray::{ArrayD, Axis};
use serde_json::json;

/// Canonical ARPES axis names, scanned in order when no axis is given:
/// binding energy first, then momentum components, then raw angles.
pub const DEFAULT_AXIS_PREFERENCE: [&str; 7] = ["eV", "kp", "kx", "kz", "ky", "phi", "polar"];

/// Smoothing hook applied before each differentiation pass. Receives the
/// values to smooth, returns a same-shape buffer.
pub type SmoothFn<'a> = &'a dyn Fn(&ArrayD<f64>) -> ArrayD<f64>;

/// Configuration for [`dn_along_axis`].
#[derive(Debug, Clone)]
pub struct DnOptions {
    /// Axis to differentiate along. `None` selects via `preference`.
    pub axis: Option<String>,
    /// Number of gradient passes; must be at least 1.
    pub order: usize,
    /// Feed each pass the previous pass's output instead of the original
    /// values. Off by default: the default contract re-smooths and
    /// re-differentiates the original array every pass.
    pub chained: bool,
    /// Axis names scanned, in order, when `axis` is `None`.
    pub preference: Vec<String>,
}

impl Default for DnOptions {
    fn default() -> Self {
        DnOptions {
            axis: None,
            order: 2,
            chained: false,
            preference: DEFAULT_AXIS_PREFERENCE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl DnOptions {
    /// Options for an explicit axis at the default order.
    pub fn along(axis: impl Into<String>) -> Self {
        DnOptions { axis: Some(axis.into()), ..Self::default() }
    }

    /// Replace the derivative order, for chained construction.
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }
}

/// Resolve the axis to differentiate along.
///
/// Explicit choice wins; otherwise the first preference-list name present
/// among the array's axes is taken, and if none matches the array's first
/// axis is used and a warning is emitted.
fn resolve_axis(arr: &LabeledArray, opts: &DnOptions) -> DerivativeResult<String> {
    if let Some(axis) = &opts.axis {
        return Ok(axis.clone());
    }

    let names = arr.axis_names();
    if let Some(preferred) = opts.preference.iter().find(|p| names.contains(&p.as_str())) {
        return Ok(preferred.clone());
    }

    let fallback = names
        .first()
        .copied()
        .ok_or(DerivativeError::NotEnoughAxes { found: 0 })?;
    log::warn!(
        "Choosing axis {} for the derivative, no preferred axis found.",
        fallback
    );
    Ok(fallback.to_string())
}

/// Nth derivative of `arr` along one axis, with optional pre-smoothing.
///
/// # Arguments
/// - `arr`: the labeled array to differentiate. Read-only.
/// - `opts`: axis selection, order, and the chained/default pass policy.
/// - `smooth`: optional smoothing hook applied before every pass; `None`
///   means identity.
/// - `sink`: optional provenance sink; `None` uses the attrs-history
///   default. Recording happens only for identity-tracked sources.
///
/// # Returns
/// A new [`LabeledArray`] of identical shape and coordinates holding the
/// final pass's output.
///
/// # Errors
/// - [`DerivativeError::InvalidOrder`] when `opts.order == 0`.
/// - [`DerivativeError::Array`] wrapping axis lookup or spacing failures.
///
/// # Notes
/// - With the default (non-chained) policy each pass re-reads the original
///   values, so for identity smoothing the order is observationally
///   irrelevant. Set `chained: true` for the compose-N derivative.
pub fn dn_along_axis(
    arr: &LabeledArray,
    opts: &DnOptions,
    smooth: Option<SmoothFn<'_>>,
    sink: Option<&mut dyn ProvenanceSink>,
) -> DerivativeResult<LabeledArray> {
    if opts.order < 1 {
        return Err(DerivativeError::InvalidOrder { order: opts.order });
    }

    let axis = resolve_axis(arr, opts)?;
    let idx = arr.axis_index(&axis)?;
    let spacing = arr.spacing(&axis)?;

    let one_pass = |input: &ArrayD<f64>| -> ArrayD<f64> {
        let smoothed = match smooth {
            Some(f) => f(input),
            None => input.clone(),
        };
        let mut buf = gradient_values(&smoothed.view(), spacing, Axis(idx));
        zero_nans(&mut buf);
        buf
    };

    let source = arr.values();
    let mut current = one_pass(source);
    for _ in 1..opts.order {
        current = if opts.chained { one_pass(&current) } else { one_pass(source) };
    }

    let mut derived = arr.with_values(current);
    let record = ProvenanceRecord::new(format!("{}th derivative", opts.order), "dn_along_axis")
        .with_param("axis", json!(axis))
        .with_param("order", json!(opts.order));
    record_if_tracked(&mut derived, arr, record, sink);

    Ok(derived)
}

/// First derivative along `axis` (or the preferred default axis).
pub fn d1_along_axis(
    arr: &LabeledArray,
    axis: Option<&str>,
    smooth: Option<SmoothFn<'_>>,
    sink: Option<&mut dyn ProvenanceSink>,
) -> DerivativeResult<LabeledArray> {
    let opts = DnOptions { axis: axis.map(String::from), order: 1, ..DnOptions::default() };
    dn_along_axis(arr, &opts, smooth, sink)
}

/// Second derivative along `axis` (or the preferred default axis), under the
/// default re-smoothing contract.
pub fn d2_along_axis(
    arr: &LabeledArray,
    axis: Option<&str>,
    smooth: Option<SmoothFn<'_>>,
    sink: Option<&mut dyn ProvenanceSink>,
) -> DerivativeResult<LabeledArray> {
    let opts = DnOptions { axis: axis.map(String::from), order: 2, ..DnOptions::default() };
    dn_along_axis(arr, &opts, smooth, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::AxisCoords;
    use crate::derivative::gradient::gradient;
    use ndarray::{Array1, ArrayD, IxDyn};
    use serde_json::Value;

    const TOL: f64 = 1e-12;

    /// 1-d array over the given axis name, unit step, filled from `f`.
    fn line_named<F: Fn(f64) -> f64>(axis: &str, n: usize, f: F) -> LabeledArray {
        LabeledArray::new(
            ArrayD::from_shape_fn(IxDyn(&[n]), |ix| f(ix[0] as f64)),
            vec![AxisCoords::new(axis, Array1::from_iter((0..n).map(|i| i as f64)))],
        )
        .unwrap()
    }

    /// 2-d array over ("phi", "eV"), unit steps, filled from `f(phi, ev)`.
    fn phi_ev_grid<F: Fn(f64, f64) -> f64>(n: usize, m: usize, f: F) -> LabeledArray {
        LabeledArray::new(
            ArrayD::from_shape_fn(IxDyn(&[n, m]), |ix| f(ix[0] as f64, ix[1] as f64)),
            vec![
                AxisCoords::new("phi", Array1::from_iter((0..n).map(|i| i as f64))),
                AxisCoords::new("eV", Array1::from_iter((0..m).map(|j| j as f64))),
            ],
        )
        .unwrap()
    }

    /// Sink that remembers every record.
    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<ProvenanceRecord>,
    }

    impl ProvenanceSink for RecordingSink {
        fn record(&mut self, _: &mut LabeledArray, _: &LabeledArray, record: ProvenanceRecord) {
            self.calls.push(record);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify order-1 equivalence: `d1_along_axis` with identity smoothing
    // matches `gradient` cell by cell.
    //
    // Given
    // -----
    // - f(x) = x³ on 9 unit-step samples over "eV".
    //
    // Expect
    // ------
    // - Both operators return identical values.
    fn order_one_matches_gradient() {
        // Arrange
        let arr = line_named("eV", 9, |x| x * x * x);

        // Act
        let d1 = d1_along_axis(&arr, Some("eV"), None, None).unwrap();
        let g = gradient(&arr, "eV").unwrap();

        // Assert
        assert_eq!(d1.values(), g.values());
    }

    #[test]
    // Purpose
    // -------
    // Pin the re-smoothing contract: with identity smoothing, every pass
    // differentiates the original values, so order 3 equals order 1.
    //
    // Given
    // -----
    // - f(x) = x³ on 9 unit-step samples.
    //
    // Expect
    // ------
    // - `order = 3` output is identical to `order = 1` output, and is NOT
    //   the third derivative (which would be a constant 6 in the interior).
    fn default_passes_reread_the_original() {
        // Arrange
        let arr = line_named("eV", 9, |x| x * x * x);
        let o1 = DnOptions::along("eV").with_order(1);
        let o3 = DnOptions::along("eV").with_order(3);

        // Act
        let d1 = dn_along_axis(&arr, &o1, None, None).unwrap();
        let d3 = dn_along_axis(&arr, &o3, None, None).unwrap();

        // Assert
        assert_eq!(d1.values(), d3.values());
        // Deep-interior first derivative of x³ is 3x² + 1 (central stencil),
        // clearly not the constant 6 a real third derivative would give.
        assert!((d3.values()[[4]] - (3.0 * 16.0 + 1.0)).abs() < TOL);
    }

    #[test]
    // Purpose
    // -------
    // Verify the chained variant composes passes: the second derivative of
    // x² is 2 in the deep interior.
    //
    // Given
    // -----
    // - f(x) = x² on 9 unit-step samples, `chained: true`, order 2.
    //
    // Expect
    // ------
    // - Cells at indices 2..=6 equal 2 within floating tolerance.
    fn chained_order_two_is_a_second_derivative() {
        // Arrange
        let arr = line_named("eV", 9, |x| x * x);
        let opts = DnOptions { chained: true, ..DnOptions::along("eV").with_order(2) };

        // Act
        let d2 = dn_along_axis(&arr, &opts, None, None).unwrap();

        // Assert
        for i in 2..=6 {
            assert!((d2.values()[[i]] - 2.0).abs() < TOL, "cell {} was {}", i, d2.values()[[i]]);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the smoothing hook is applied before differentiation.
    //
    // Given
    // -----
    // - f(x) = x on 7 samples and a smoothing hook that doubles the values.
    //
    // Expect
    // ------
    // - The derivative is 2 everywhere instead of 1.
    fn smoothing_is_applied_before_each_pass() {
        // Arrange
        let arr = line_named("eV", 7, |x| x);
        let double = |v: &ArrayD<f64>| v.mapv(|x| 2.0 * x);

        // Act
        let d = d1_along_axis(&arr, Some("eV"), Some(&double), None).unwrap();

        // Assert
        for &v in d.values().iter() {
            assert!((v - 2.0).abs() < TOL);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify default-axis selection: the first preference-list name present
    // among the array's axes wins, regardless of dimension order.
    //
    // Given
    // -----
    // - A ("phi", "eV") grid with f = ev², so the derivative along "eV" is
    //   2·ev in the interior while the derivative along "phi" is 0.
    //
    // Expect
    // ------
    // - With no axis given, "eV" is selected (it precedes "phi" in the
    //   preference list) and the interior values match 2·ev.
    fn preference_list_selects_ev_over_phi() {
        // Arrange
        let arr = phi_ev_grid(4, 6, |_, ev| ev * ev);
        let opts = DnOptions::default().with_order(1);

        // Act
        let d = dn_along_axis(&arr, &opts, None, None).unwrap();

        // Assert
        for i in 0..4 {
            for j in 1..5 {
                assert!((d.values()[[i, j]] - 2.0 * j as f64).abs() < TOL);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the explicit preference override: a caller-supplied list is
    // honored instead of the canonical one.
    //
    // Given
    // -----
    // - The ("phi", "eV") grid and a preference list containing only "phi".
    //
    // Expect
    // ------
    // - The derivative is taken along "phi": zero for an eV-only field.
    fn preference_override_is_honored() {
        // Arrange
        let arr = phi_ev_grid(4, 6, |_, ev| ev * ev);
        let opts = DnOptions {
            preference: vec!["phi".to_string()],
            ..DnOptions::default().with_order(1)
        };

        // Act
        let d = dn_along_axis(&arr, &opts, None, None).unwrap();

        // Assert
        assert!(d.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    // Purpose
    // -------
    // Verify the non-fatal fallback: axes entirely outside the preference
    // list warn and proceed along the first axis.
    //
    // Given
    // -----
    // - A grid with axes ("temp", "pressure") and f = temp², so only a
    //   first-axis derivative is nonzero.
    //
    // Expect
    // ------
    // - The call succeeds and the interior values match 2·temp.
    fn missing_preference_falls_back_to_first_axis() {
        // Arrange
        let arr = LabeledArray::new(
            ArrayD::from_shape_fn(IxDyn(&[6, 3]), |ix| (ix[0] as f64).powi(2)),
            vec![
                AxisCoords::new("temp", Array1::from_iter((0..6).map(|i| i as f64))),
                AxisCoords::new("pressure", Array1::from_iter((0..3).map(|j| j as f64))),
            ],
        )
        .unwrap();
        let opts = DnOptions::default().with_order(1);

        // Act
        let d = dn_along_axis(&arr, &opts, None, None).unwrap();

        // Assert
        for i in 1..5 {
            for j in 0..3 {
                assert!((d.values()[[i, j]] - 2.0 * i as f64).abs() < TOL);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that order 0 is rejected up front.
    //
    // Given
    // -----
    // - Any valid array and `order = 0`.
    //
    // Expect
    // ------
    // - `DerivativeError::InvalidOrder { order: 0 }`.
    fn order_zero_is_rejected() {
        // Arrange
        let arr = line_named("eV", 5, |x| x);
        let opts = DnOptions::along("eV").with_order(0);

        // Act
        let result = dn_along_axis(&arr, &opts, None, None);

        // Assert
        assert_eq!(
            result.expect_err("order 0 must fail"),
            DerivativeError::InvalidOrder { order: 0 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify conditional provenance: a tracked source yields exactly one
    // record with the contract payload and the derived array loses its id;
    // an untracked source records nothing.
    //
    // Given
    // -----
    // - The same field with and without an "id" attribute, a recording sink.
    //
    // Expect
    // ------
    // - Tracked: one call, what "2th derivative", by "dn_along_axis",
    //   axis "eV", order 2; derived attrs carry no "id".
    // - Untracked: zero calls.
    fn provenance_follows_the_tracking_rule() {
        // Arrange
        let tracked = line_named("eV", 5, |x| x * x).with_attr("id", Value::from("scan-1"));
        let untracked = line_named("eV", 5, |x| x * x);
        let mut sink = RecordingSink::default();

        // Act
        let derived = d2_along_axis(&tracked, Some("eV"), None, Some(&mut sink)).unwrap();
        let plain = d2_along_axis(&untracked, Some("eV"), None, Some(&mut sink)).unwrap();

        // Assert
        assert_eq!(sink.calls.len(), 1);
        assert_eq!(sink.calls[0].what, "2th derivative");
        assert_eq!(sink.calls[0].by, "dn_along_axis");
        assert_eq!(sink.calls[0].params["axis"], Value::from("eV"));
        assert_eq!(sink.calls[0].params["order"], Value::from(2));
        assert!(!derived.attributes().contains_key("id"));
        assert!(plain.attributes().is_empty());
    }
}
