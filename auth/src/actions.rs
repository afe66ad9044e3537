//! Session actions.
//!
//! Commands (user intent) and the events produced by completed effects.
//! Actions are the only way to change session state.

use lectern_api::{Credentials, User};

/// Session action.
#[derive(Debug, Clone)]
pub enum SessionAction {
    /// Re-establish a session from storage at startup.
    ///
    /// No network call: a cached profile plus a live access token is enough
    /// to transition to Authenticated. Anything less stays Unauthenticated.
    Restore,

    /// Log in with username and password.
    Login {
        /// Submitted credentials.
        credentials: Credentials,
    },

    /// Login effect succeeded; tokens and profile are already persisted.
    LoginSucceeded {
        /// The authenticated user.
        user: User,
    },

    /// Login effect failed.
    LoginFailed {
        /// Server-provided message, or a generic fallback.
        message: String,
    },

    /// Log out: best-effort remote call, then unconditional local teardown.
    Logout,

    /// Logout effect finished; both storages are cleared.
    LoggedOut,

    /// Dismiss the surfaced login error.
    ClearError,
}
