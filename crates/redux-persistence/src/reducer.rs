//! Reducer wrapper merging loaded state into the store

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::actions::{Action, LOAD};
use crate::error::PersistenceError;
use crate::merger::shallow_merge;

/// Wrap `inner` so that LOAD actions merge their payload into the state first.
///
/// For a LOAD action the state passed to `inner` is `merger(&state, payload)`
/// (a missing payload counts as `Null`). Every other action passes the state
/// through untouched. `inner` always runs; a failing merger skips it and
/// returns the error.
pub fn reducer<S, R, M>(inner: R, merger: M) -> impl Fn(S, &Action) -> Result<S, PersistenceError>
where
    R: Fn(S, &Action) -> S,
    M: Fn(&S, &Value) -> Result<S, PersistenceError>,
{
    move |state: S, action: &Action| {
        let state = if action.kind == LOAD {
            match &action.payload {
                Some(payload) => merger(&state, payload)?,
                None => merger(&state, &Value::Null)?,
            }
        } else {
            state
        };
        Ok(inner(state, action))
    }
}

/// [`reducer`] with [`shallow_merge`] as merger.
pub fn reducer_with_default_merger<S, R>(
    inner: R,
) -> impl Fn(S, &Action) -> Result<S, PersistenceError>
where
    S: Serialize + DeserializeOwned,
    R: Fn(S, &Action) -> S,
{
    reducer(inner, shallow_merge::<S>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::RefCell;

    /// Inner reducer recording what it was called with.
    fn spy(calls: &RefCell<Vec<(Value, Action)>>) -> impl Fn(Value, &Action) -> Value + '_ {
        move |state: Value, action: &Action| {
            calls.borrow_mut().push((state.clone(), action.clone()));
            state
        }
    }

    #[test]
    fn test_non_load_actions_pass_state_through() {
        let calls = RefCell::new(Vec::new());
        let wrapped = reducer_with_default_merger(spy(&calls));
        let action = Action::with_payload("SOMETHING", json!({}));

        wrapped(json!({ "x": 1 }), &action).unwrap();

        assert_eq!(*calls.borrow(), vec![(json!({ "x": 1 }), action)]);
    }

    #[test]
    fn test_default_merger() {
        let calls = RefCell::new(Vec::new());
        let wrapped = reducer_with_default_merger(spy(&calls));
        let action = Action::load(json!({ "y": 42 }));

        let state = wrapped(json!({ "x": 0, "y": 0 }), &action).unwrap();

        assert_eq!(state, json!({ "x": 0, "y": 42 }));
        assert_eq!(*calls.borrow(), vec![(json!({ "x": 0, "y": 42 }), action)]);
    }

    #[test]
    fn test_custom_merger() {
        let calls = RefCell::new(Vec::new());
        let old = json!({ "x": 0, "y": 0 });
        let wrapped = reducer(spy(&calls), |a: &Value, b: &Value| {
            assert_eq!(a, &json!({ "x": 0, "y": 0 }));
            assert_eq!(b, &json!({ "y": 42 }));
            Ok(json!({ "c": 1 }))
        });
        let action = Action::load(json!({ "y": 42 }));

        wrapped(old, &action).unwrap();

        assert_eq!(*calls.borrow(), vec![(json!({ "c": 1 }), action)]);
    }

    #[test]
    fn test_merger_not_called_for_other_actions() {
        let wrapped = reducer(|state: Value, _: &Action| state, |_: &Value, _: &Value| {
            panic!("merger must not run")
        });
        assert_eq!(wrapped(json!(1), &Action::new("X")).unwrap(), json!(1));
    }

    #[test]
    fn test_load_without_payload() {
        let wrapped = reducer_with_default_merger(|state: Value, _: &Action| state);
        let state = wrapped(json!({ "x": 1 }), &Action::new(LOAD)).unwrap();
        assert_eq!(state, json!({ "x": 1 }));
    }

    #[test]
    fn test_merge_error_propagates() {
        let calls = RefCell::new(Vec::new());
        let wrapped = reducer_with_default_merger(spy(&calls));

        let result = wrapped(json!("scalar"), &Action::load(json!({ "y": 1 })));

        assert!(matches!(result, Err(PersistenceError::Merge(_))));
        assert!(calls.borrow().is_empty());
    }
}
