//! Session reducer.
//!
//! Owns the login/logout lifecycle and what gets written to which storage
//! tier. All storage writes happen inside effects; `reduce` itself only
//! touches state, with one exception: `Restore` reads storage synchronously
//! because it must resolve before the first render and makes no network
//! call.

use crate::actions::SessionAction;
use crate::environment::SessionEnvironment;
use crate::providers::{AuthGateway, ProfileStore};
use crate::state::SessionState;
use lectern_api::{ApiError, CredentialVault};
use lectern_core::effect::Effect;
use lectern_core::reducer::Reducer;
use lectern_core::{SmallVec, smallvec};

/// Fallback shown when a failed login carries no server message.
const LOGIN_FALLBACK_MESSAGE: &str = "Login failed. Check your username and password.";

/// Session reducer over [`SessionState`].
#[derive(Debug, Clone)]
pub struct SessionReducer<G, V, P> {
    _phantom: std::marker::PhantomData<(G, V, P)>,
}

impl<G, V, P> SessionReducer<G, V, P> {
    /// Create a new session reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<G, V, P> Default for SessionReducer<G, V, P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Message surfaced for a failed login.
///
/// A 401 from `/auth/login` means bad credentials, not an expired session,
/// so the adapter's generic session copy is not used here: prefer the
/// server's own message, fall back to a credentials hint.
fn login_failure_message(error: &ApiError) -> String {
    match error {
        ApiError::Http { message, .. } if !message.is_empty() => message.clone(),
        ApiError::Http { .. } => LOGIN_FALLBACK_MESSAGE.to_string(),
        other => other.user_message(),
    }
}

impl<G, V, P> Reducer for SessionReducer<G, V, P>
where
    G: AuthGateway + Clone + 'static,
    V: CredentialVault + Clone + 'static,
    P: ProfileStore + Clone + 'static,
{
    type State = SessionState;
    type Action = SessionAction;
    type Environment = SessionEnvironment<G, V, P>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Restore: re-establish a session from storage, no network
            // ═══════════════════════════════════════════════════════════════
            SessionAction::Restore => {
                let profile = env.profiles.load();
                let has_access_token = env.vault.access_token().is_some();

                match (profile, has_access_token) {
                    (Some(user), true) => {
                        tracing::debug!(user_id = %user.id, "session restored from storage");
                        state.user = Some(user);
                    }
                    (profile, _) => {
                        // A profile without a live access token (or the
                        // reverse) is a half-session; stay unauthenticated
                        // and let the next login rewrite both storages.
                        if profile.is_some() {
                            tracing::debug!("cached profile present but no access token");
                        }
                        state.user = None;
                    }
                }
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════════
            // Login: call the gateway, persist tokens + profile on success
            // ═══════════════════════════════════════════════════════════════
            SessionAction::Login { credentials } => {
                state.loading = true;
                state.error = None;

                let auth = env.auth.clone();
                let vault = env.vault.clone();
                let profiles = env.profiles.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    match auth.login(credentials).await {
                        Ok(response) => {
                            vault.set_access_token(&response.access_token);
                            if let Some(refresh) = &response.refresh_token {
                                vault.set_refresh_token(refresh);
                            }
                            profiles.store(&response.user);
                            tracing::info!(user_id = %response.user.id, "login succeeded");
                            Some(SessionAction::LoginSucceeded {
                                user: response.user,
                            })
                        }
                        Err(error) => {
                            tracing::warn!(%error, "login failed");
                            Some(SessionAction::LoginFailed {
                                message: login_failure_message(&error),
                            })
                        }
                    }
                }))]
            }

            SessionAction::LoginSucceeded { user } => {
                state.user = Some(user);
                state.loading = false;
                state.error = None;
                smallvec![Effect::None]
            }

            SessionAction::LoginFailed { message } => {
                state.user = None;
                state.loading = false;
                state.error = Some(message);
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════════
            // Logout: best-effort remote call, unconditional local teardown
            // ═══════════════════════════════════════════════════════════════
            SessionAction::Logout => {
                state.loading = true;

                let auth = env.auth.clone();
                let vault = env.vault.clone();
                let profiles = env.profiles.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    if let Err(error) = auth.logout().await {
                        // Remote logout failing must not trap the user in a
                        // session; local teardown proceeds regardless.
                        tracing::warn!(%error, "remote logout failed, clearing locally");
                    }
                    vault.clear();
                    profiles.clear();
                    Some(SessionAction::LoggedOut)
                }))]
            }

            SessionAction::LoggedOut => {
                state.user = None;
                state.loading = false;
                state.error = None;
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════════
            // ClearError: dismiss the surfaced login error
            // ═══════════════════════════════════════════════════════════════
            SessionAction::ClearError => {
                state.error = None;
                smallvec![Effect::None]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MemoryProfileStore, MockAuthGateway};
    use lectern_api::mocks::MemoryVault;
    use lectern_api::{Role, User};
    use lectern_testing::assertions::assert_no_effects;
    use lectern_testing::ReducerTest;

    type TestReducer = SessionReducer<MockAuthGateway, MemoryVault, MemoryProfileStore>;
    type TestEnv = SessionEnvironment<MockAuthGateway, MemoryVault, MemoryProfileStore>;

    fn env() -> TestEnv {
        SessionEnvironment::new(
            MockAuthGateway::new(),
            MemoryVault::new(),
            MemoryProfileStore::new(),
        )
    }

    fn teacher() -> User {
        User {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: Role::Teacher,
        }
    }

    #[test]
    fn test_login_succeeded_sets_user_and_clears_flags() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(SessionState {
                loading: true,
                error: Some("old".into()),
                ..SessionState::default()
            })
            .when_action(SessionAction::LoginSucceeded { user: teacher() })
            .then_state(|state| {
                assert!(state.is_authenticated());
                assert!(!state.loading);
                assert!(state.error.is_none());
            })
            .then_effects(assert_no_effects)
            .run();
    }

    #[test]
    fn test_login_failed_surfaces_message() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(SessionState {
                loading: true,
                ..SessionState::default()
            })
            .when_action(SessionAction::LoginFailed {
                message: "nope".into(),
            })
            .then_state(|state| {
                assert!(!state.is_authenticated());
                assert!(!state.loading);
                assert_eq!(state.error.as_deref(), Some("nope"));
            })
            .then_effects(assert_no_effects)
            .run();
    }

    #[test]
    fn test_logged_out_resets_everything() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(SessionState {
                user: Some(teacher()),
                loading: true,
                error: Some("stale".into()),
            })
            .when_action(SessionAction::LoggedOut)
            .then_state(|state| {
                assert_eq!(*state, SessionState::default());
            })
            .then_effects(assert_no_effects)
            .run();
    }

    #[test]
    fn test_login_failure_message_prefers_server_copy() {
        let error = ApiError::Http {
            status: reqwest::StatusCode::UNAUTHORIZED,
            message: "Invalid username or password".to_string(),
            errors: Vec::new(),
        };
        assert_eq!(login_failure_message(&error), "Invalid username or password");
    }

    #[test]
    fn test_login_failure_message_falls_back_when_server_is_silent() {
        let error = ApiError::Http {
            status: reqwest::StatusCode::UNAUTHORIZED,
            message: String::new(),
            errors: Vec::new(),
        };
        assert_eq!(login_failure_message(&error), LOGIN_FALLBACK_MESSAGE);
    }
}
