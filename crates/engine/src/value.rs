//! Template data values.
//!
//! Template data is dynamically typed: a resolved entry may be a scalar, a
//! list of records (`repeat#`) or a record itself, discovered only at
//! dispatch time. `serde_json::Value` is that closed variant set, and the
//! primary data map is simply a JSON object map.

use serde_json::Value;

/// The caller-supplied data map. Mutated in place by `set#`, `set?` and
/// `unSet#`; the mutations remain observable after `parse` returns.
pub type DataMap = serde_json::Map<String, Value>;

/// Textual form of a resolved value, produced only at the point of
/// emission. Strings render bare; any other value renders as compact JSON.
pub(crate) fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
