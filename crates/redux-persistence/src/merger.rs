//! Strategies for combining the current state with loaded state

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::PersistenceError;

/// Shallow merge of the loaded payload over the current state.
///
/// Both sides must be records: top level keys of `loaded` replace those of
/// `old`, nested values are not merged. A `Null` payload (nothing stored yet)
/// keeps `old` as is. Anything else that is not a record is rejected rather
/// than guessed at.
pub fn shallow_merge<S>(old: &S, loaded: &Value) -> Result<S, PersistenceError>
where
    S: Serialize + DeserializeOwned,
{
    let mut merged = match serde_json::to_value(old)? {
        Value::Object(record) => record,
        other => {
            return Err(PersistenceError::Merge(format!(
                "current state must be a record, got {}",
                describe(&other)
            )))
        }
    };

    match loaded {
        Value::Null => {}
        Value::Object(record) => {
            for (key, value) in record {
                merged.insert(key.clone(), value.clone());
            }
        }
        other => {
            return Err(PersistenceError::Merge(format!(
                "loaded state must be a record, got {}",
                describe(other)
            )))
        }
    }

    serde_json::from_value(Value::Object(merged))
        .map_err(|e| PersistenceError::Merge(e.to_string()))
}

/// Take the loaded payload as the new state, ignoring the current one.
///
/// A `Null` payload keeps `old`.
pub fn replace<S>(old: &S, loaded: &Value) -> Result<S, PersistenceError>
where
    S: Serialize + DeserializeOwned,
{
    let value = match loaded {
        Value::Null => serde_json::to_value(old)?,
        other => other.clone(),
    };
    serde_json::from_value(value).map_err(|e| PersistenceError::Merge(e.to_string()))
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a record",
    }
}
