//! Shallow record diffing
//!
//! Computes partial-update payloads: given an original record and an edited copy of the
//! same shape, keep only the keys whose values changed.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::KbError;
use crate::result::KbResult;

/// Keys of `original` whose values differ in `modified`, carrying `modified`'s values.
///
/// Comparison is shallow: nested arrays and objects are compared as whole values.
/// A key missing from `modified` is reported with a `null` value.
pub fn diff_objects(original: &Map<String, Value>, modified: &Map<String, Value>) -> Map<String, Value> {
    original
        .iter()
        .filter_map(|(key, before)| {
            let after = modified.get(key).unwrap_or(&Value::Null);
            (before != after).then(|| (key.clone(), after.clone()))
        })
        .collect()
}

/// Typed front end to [`diff_objects`] for any record that serializes to a JSON object
pub fn modified_fields<T: Serialize>(original: &T, modified: &T) -> KbResult<Map<String, Value>> {
    let original = to_object(original)?;
    let modified = to_object(modified)?;
    Ok(diff_objects(&original, &modified))
}

fn to_object<T: Serialize>(record: &T) -> KbResult<Map<String, Value>> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(KbError::Internal(format!(
            "cannot diff a non-object value: {}",
            other
        ))),
        Err(e) => Err(KbError::Internal(format!("cannot serialize record: {}", e))),
    }
}
