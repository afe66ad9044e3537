//! Session state.

use lectern_api::{Role, User};
use serde::{Deserialize, Serialize};

/// Root session state managed by the session reducer.
///
/// Two observable states: Unauthenticated (`user` is `None`, the initial
/// state and the state after logout or failed refresh) and Authenticated.
///
/// # Examples
///
/// ```
/// # use lectern_auth::SessionState;
/// let state = SessionState::default();
/// assert!(!state.is_authenticated());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Current user (if logged in).
    pub user: Option<User>,

    /// A login or logout flow is in flight.
    pub loading: bool,

    /// Message from the last failed login, for the UI to surface.
    pub error: Option<String>,
}

impl SessionState {
    /// Derived authentication flag. Always computed, never stored.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Role of the current user, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }

    /// `true` when the current user may create, edit, or delete posts.
    #[must_use]
    pub fn can_manage_posts(&self) -> bool {
        self.role().is_some_and(Role::can_manage_posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teacher() -> User {
        User {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: Role::Teacher,
        }
    }

    #[test]
    fn test_is_authenticated_tracks_user() {
        let mut state = SessionState::default();
        assert!(!state.is_authenticated());
        state.user = Some(teacher());
        assert!(state.is_authenticated());
    }

    #[test]
    fn test_capability_follows_role() {
        let state = SessionState {
            user: Some(teacher()),
            ..SessionState::default()
        };
        assert!(state.can_manage_posts());

        let mut student = teacher();
        student.role = Role::Student;
        let state = SessionState {
            user: Some(student),
            ..SessionState::default()
        };
        assert!(!state.can_manage_posts());
    }
}
