//! Status dictionaries.
//!
//! Backends exchange configuration with the kernel as JSON object maps, so a
//! front end can pass user input through without knowing each backend's
//! parameter types.

use serde_json::Value;

/// A status dictionary: property name → value.
pub type Dictionary = serde_json::Map<String, Value>;

/// Property names understood by the built-in backends.
pub mod names {
    pub const PRECISION:      &str = "precision";
    pub const FILE_EXTENSION: &str = "file_extension";
    pub const FILENAMES:      &str = "filenames";
}

/// Append `value` to the array stored under `key`, creating the array if the
/// key is missing or holds something else.
pub fn append_property(d: &mut Dictionary, key: &str, value: impl Into<Value>) {
    let slot = d
        .entry(key.to_owned())
        .or_insert_with(|| Value::Array(Vec::new()));
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    if let Value::Array(items) = slot {
        items.push(value.into());
    }
}
