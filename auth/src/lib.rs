//! # Lectern Auth
//!
//! The authentication session store: a reducer over [`SessionState`] with
//! two observable states, Unauthenticated and Authenticated.
//!
//! - `Restore` runs once at startup and re-establishes a session from
//!   storage without a network call.
//! - `Login` calls the auth gateway, persists the token pair and the user
//!   profile, and transitions to Authenticated.
//! - `Logout` makes a best-effort remote call, then unconditionally clears
//!   both storages and transitions to Unauthenticated.
//!
//! `is_authenticated` is always derived from `user`; it is never stored.
//!
//! ## Example: login flow
//!
//! ```rust,ignore
//! use lectern_auth::*;
//!
//! let effects = reducer.reduce(
//!     &mut state,
//!     SessionAction::Login { credentials },
//!     &env,
//! );
//! // Execute effects; on success the store observes LoginSucceeded
//! assert!(state.is_authenticated());
//! ```

// Public modules
pub mod actions;
pub mod environment;
pub mod providers;
pub mod reducer;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use actions::SessionAction;
pub use environment::SessionEnvironment;
pub use lectern_api::{Credentials, Role, User};
pub use providers::{AuthGateway, ProfileStore};
pub use reducer::SessionReducer;
pub use state::SessionState;
