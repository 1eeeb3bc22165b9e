//! Actions flowing through the store pipeline
//!
//! Hosts dispatch [`Dispatched`] values. Only well-formed records carrying a
//! `type` field are turned into an [`Action`]; everything else is reported as
//! an [`InvalidAction`] and ignored for persistence purposes.
//!
//! Two action types are owned by this crate:
//! - [`LOAD`] is dispatched by the loader with the rehydrated state as payload
//! - [`SAVE`] is dispatched by the save middleware after a successful save

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::warnings::InvalidAction;

/// Action type dispatched after state was loaded from storage.
pub const LOAD: &str = "REDUX_PERSISTENCE_LOAD";

/// Action type dispatched after state was written to storage.
pub const SAVE: &str = "REDUX_PERSISTENCE_SAVE";

/// A validated action: a discriminant plus optional payload and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl Action {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
            meta: None,
        }
    }

    pub fn with_payload(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            payload: Some(payload),
            ..Self::new(kind)
        }
    }

    /// The action the loader dispatches with freshly loaded state.
    pub fn load(state: Value) -> Self {
        Self::with_payload(LOAD, state)
    }

    /// The confirmation dispatched once `state` has been saved.
    pub fn save(state: Value) -> Self {
        Self::with_payload(SAVE, state)
    }

    /// `true` for the LOAD and SAVE actions owned by this crate.
    pub fn is_persistence_action(&self) -> bool {
        self.kind == LOAD || self.kind == SAVE
    }

    /// Render the action as a JSON record (`type`, `payload`, `meta`).
    pub fn to_value(&self) -> Value {
        let mut record = Map::new();
        record.insert("type".to_string(), Value::String(self.kind.clone()));
        if let Some(payload) = &self.payload {
            record.insert("payload".to_string(), payload.clone());
        }
        if let Some(meta) = &self.meta {
            record.insert("meta".to_string(), meta.clone());
        }
        Value::Object(record)
    }
}

/// A function dispatched in place of an action.
pub type Thunk = Box<dyn FnOnce() + Send>;

/// Anything a host may push into the dispatch pipeline.
pub enum Dispatched {
    /// An already typed action.
    Action(Action),
    /// An untyped value, usually decoded from somewhere else. May be malformed.
    Value(Value),
    /// A function instead of an action.
    Thunk(Thunk),
}

impl Dispatched {
    pub fn thunk(f: impl FnOnce() + Send + 'static) -> Self {
        Dispatched::Thunk(Box::new(f))
    }
}

impl fmt::Debug for Dispatched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatched::Action(action) => f.debug_tuple("Action").field(action).finish(),
            Dispatched::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Dispatched::Thunk(_) => f.write_str("Thunk(..)"),
        }
    }
}

impl From<Action> for Dispatched {
    fn from(action: Action) -> Self {
        Dispatched::Action(action)
    }
}

impl From<Value> for Dispatched {
    fn from(value: Value) -> Self {
        Dispatched::Value(value)
    }
}

/// Check the shape of a dispatched value.
///
/// Only records are actions, and only if they have a `type` field. A `type`
/// that is not a string is kept in its JSON rendering.
pub fn validate(dispatched: &Dispatched) -> Result<Action, InvalidAction> {
    match dispatched {
        Dispatched::Action(action) => Ok(action.clone()),
        Dispatched::Thunk(_) => Err(InvalidAction::Callable),
        Dispatched::Value(Value::Object(record)) => {
            let kind = match record.get("type") {
                Some(Value::String(kind)) => kind.clone(),
                Some(other) => other.to_string(),
                None => return Err(InvalidAction::MissingType),
            };
            Ok(Action {
                kind,
                payload: record.get("payload").cloned(),
                meta: record.get("meta").cloned(),
            })
        }
        Dispatched::Value(Value::String(text)) => Err(InvalidAction::NonRecord(text.clone())),
        Dispatched::Value(other) => Err(InvalidAction::NonRecord(other.to_string())),
    }
}
