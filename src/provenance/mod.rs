//! provenance — lineage records and the conditional recording capability.
//!
//! Purpose
//! -------
//! Describe how a derived array was produced from its source, and route that
//! description to a caller-chosen sink. Recording is conditional: only
//! arrays that carry an `"id"` attribute (i.e. persisted/named instances)
//! accrue lineage, and the derived array loses its `"id"` when a record is
//! written — it becomes unpersisted until explicitly saved again.
//!
//! Key behaviors
//! -------------
//! - Represent one transformation as a [`ProvenanceRecord`]: operation name
//!   (`what`), producing routine (`by`), and operation-specific parameters.
//! - Expose the collaborator seam as the [`ProvenanceSink`] trait so tests
//!   and host applications can substitute their own recorder.
//! - Apply the conditional rule in [`record_if_tracked`]: no-op when the
//!   derived attrs carry no `"id"`; otherwise delete `"id"` first, then
//!   delegate to the sink.
//! - Default to [`AttrHistorySink`], which appends the record (plus the
//!   source's id as `parent_id`) to a `"provenance"` history list in the
//!   derived array's attributes.
//!
//! Invariants & assumptions
//! ------------------------
//! - The derived array's attrs are a copy of the source's at the time of the
//!   call, so the `"id"` check on the derived array mirrors the source's
//!   persisted state.
//! - Records are JSON-serializable; parameter values are `serde_json::Value`.
//! - A skipped recording (untracked source) leaves the derived array's attrs
//!   byte-for-byte as inherited; it is not an error.
//!
//! Downstream usage
//! ----------------
//! - The derivative operators call [`record_if_tracked`] with the record
//!   payloads fixed by their contracts; callers pass `None` to get the
//!   attrs-history default or `Some(sink)` to route lineage elsewhere.
use crate::array::LabeledArray;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// One lineage entry: which operation produced a derived array, and with
/// which parameters.
///
/// Serializes flat: `{"what": ..., "by": ..., <params...>}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvenanceRecord {
    pub what: String,
    pub by: String,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl ProvenanceRecord {
    /// Construct a record with an empty parameter map.
    pub fn new(what: impl Into<String>, by: impl Into<String>) -> Self {
        ProvenanceRecord { what: what.into(), by: by.into(), params: Map::new() }
    }

    /// Attach one operation-specific parameter, for chained construction.
    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// The record as a flat JSON object.
    pub fn to_value(&self) -> Value {
        // Serialization of this struct cannot fail: all fields are JSON maps
        // and strings.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Collaborator seam for lineage recording.
///
/// Implementations receive the derived array (already stripped of its
/// `"id"`), the source array, and the record describing the transformation.
pub trait ProvenanceSink {
    fn record(&mut self, derived: &mut LabeledArray, source: &LabeledArray, record: ProvenanceRecord);
}

/// Default sink: lineage lives in the derived array's attributes.
///
/// Appends the record — augmented with the source's id as `parent_id`, when
/// the source carries one — to a `"provenance"` list attribute, creating the
/// list on first use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttrHistorySink;

impl ProvenanceSink for AttrHistorySink {
    fn record(&mut self, derived: &mut LabeledArray, source: &LabeledArray, record: ProvenanceRecord) {
        let mut entry = record.to_value();
        if let (Value::Object(map), Some(id)) = (&mut entry, source.id()) {
            map.insert("parent_id".to_string(), json!(id));
        }

        let attrs = derived.attributes_mut();
        match attrs.get_mut("provenance") {
            Some(Value::Array(history)) => history.push(entry),
            _ => {
                attrs.insert("provenance".to_string(), Value::Array(vec![entry]));
            }
        }
    }
}

/// Apply the conditional recording rule.
///
/// - If the derived attrs carry no `"id"`, this is a no-op.
/// - Otherwise the `"id"` key is removed first, and the record is delegated
///   to `sink`, or to [`AttrHistorySink`] when `sink` is `None`.
pub fn record_if_tracked(
    derived: &mut LabeledArray,
    source: &LabeledArray,
    record: ProvenanceRecord,
    sink: Option<&mut dyn ProvenanceSink>,
) {
    if !derived.attributes().contains_key("id") {
        return;
    }
    derived.attributes_mut().remove("id");

    match sink {
        Some(sink) => sink.record(derived, source, record),
        None => AttrHistorySink.record(derived, source, record),
    }
}
