//! Configuration types for the Sermepa payment method.
//!
//! Settings are persisted by the host as a generic key-value mapping
//! ([`ConfigurationMapping`]). The types here are fixed-shape views over the
//! subset of keys this plugin owns.

mod basic;
mod config_store;
mod merchant;

pub use basic::{BasicConfiguration, EXECUTE_STATUSES};
pub use config_store::{ConfigStore, ConfigWatcher};
pub use merchant::{DerivativeConfiguration, MerchantConfiguration};

use serde_json::{Map, Value};

/// The host's key-value representation of plugin configuration.
pub type ConfigurationMapping = Map<String, Value>;

/// Whether a stored value counts as set.
///
/// Blank strings and the literal `"0"` count as unset.
pub fn is_set(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed != "0"
}

/// Returns `value` when it is set, `""` otherwise.
pub(crate) fn or_empty(value: &str) -> &str {
    if is_set(value) { value } else { "" }
}

/// Remove `key` from `mapping` as a string.
///
/// Numbers are stringified and `null` reads as absent. Booleans, arrays and
/// objects are left in `mapping` untouched and read as absent.
pub(crate) fn take_string(mapping: &mut ConfigurationMapping, key: &str) -> String {
    match mapping.get(key) {
        Some(kept @ (Value::Bool(_) | Value::Array(_) | Value::Object(_))) => {
            tracing::warn!(key, kind = value_kind(kept), "keeping unreadable configuration value aside");
            return String::new();
        }
        None => return String::new(),
        Some(_) => {}
    }
    match mapping.remove(key) {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Store `value` under `key`, unless `value` is empty and `key` holds a
/// value [`take_string`] left aside.
pub(crate) fn put_string(mapping: &mut ConfigurationMapping, key: &str, value: &str) {
    if value.is_empty() && mapping.get(key).is_some_and(|kept| !kept.is_string()) {
        return;
    }
    mapping.insert(key.to_owned(), Value::String(value.to_owned()));
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
