//! Warning messages logged by the save middleware

use thiserror::Error;

/// Prefix shared by every message this crate logs on behalf of the user.
pub const PREFIX: &str = "[redux-persistence]";

/// Logged (outside production) when a save fails and no `on_error` handler is set.
pub const DEFAULT_ERROR_HANDLER: &str = "[redux-persistence] Using default error handler, \
     specify your own using the on_error option when creating the middleware";

/// Why a dispatched value was not accepted as an action.
///
/// The `Display` output is the warning the middleware logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAction {
    #[error(
        "[redux-persistence] ACTION IGNORED! Actions should be objects with a type property \
         but received a function! Your function resolving middleware (e.g. a thunk middleware) \
         must be placed BEFORE the persistence middleware!"
    )]
    Callable,

    #[error(
        "[redux-persistence] ACTION IGNORED! Actions should be objects with a type property \
         but received: {0}"
    )]
    NonRecord(String),

    #[error("[redux-persistence] ACTION IGNORED! Action objects should have a type property.")]
    MissingType,
}
