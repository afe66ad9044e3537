//! Mock implementations of the session providers for testing.
//!
//! All mocks use interior mutability so tests can script outcomes and
//! inspect call counts through shared clones.

use crate::providers::{AuthGateway, ProfileStore};
use lectern_api::{ApiError, Credentials, LoginResponse, Role, User};
use reqwest::StatusCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn default_user() -> User {
    User {
        id: "u1".to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        role: Role::Teacher,
    }
}

/// Scripted failure for a mock gateway call.
#[derive(Debug, Clone)]
struct ScriptedFailure {
    status: StatusCode,
    message: String,
}

impl ScriptedFailure {
    fn to_error(&self) -> ApiError {
        ApiError::Http {
            status: self.status,
            message: self.message.clone(),
            errors: Vec::new(),
        }
    }
}

/// Mock auth gateway with scriptable outcomes and call counters.
#[derive(Clone)]
pub struct MockAuthGateway {
    user: Arc<Mutex<User>>,
    login_failure: Arc<Mutex<Option<ScriptedFailure>>>,
    logout_failure: Arc<Mutex<Option<ScriptedFailure>>>,
    login_calls: Arc<AtomicUsize>,
    logout_calls: Arc<AtomicUsize>,
    omit_refresh_token: Arc<Mutex<bool>>,
}

impl Default for MockAuthGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::unwrap_used)]
impl MockAuthGateway {
    /// Gateway that logs in a default teacher user.
    #[must_use]
    pub fn new() -> Self {
        Self {
            user: Arc::new(Mutex::new(default_user())),
            login_failure: Arc::new(Mutex::new(None)),
            logout_failure: Arc::new(Mutex::new(None)),
            login_calls: Arc::new(AtomicUsize::new(0)),
            logout_calls: Arc::new(AtomicUsize::new(0)),
            omit_refresh_token: Arc::new(Mutex::new(false)),
        }
    }

    /// Use a specific user for successful logins.
    #[must_use]
    pub fn with_user(self, user: User) -> Self {
        *self.user.lock().unwrap() = user;
        self
    }

    /// Script the next logins to fail with the given status and message.
    #[must_use]
    pub fn failing_login(self, status: StatusCode, message: &str) -> Self {
        *self.login_failure.lock().unwrap() = Some(ScriptedFailure {
            status,
            message: message.to_string(),
        });
        self
    }

    /// Script logout calls to fail with the given status.
    #[must_use]
    pub fn failing_logout(self, status: StatusCode) -> Self {
        *self.logout_failure.lock().unwrap() = Some(ScriptedFailure {
            status,
            message: "logout failed".to_string(),
        });
        self
    }

    /// Successful logins return no refresh token, like deployments that
    /// keep sessions cookie-side.
    #[must_use]
    pub fn without_refresh_token(self) -> Self {
        *self.omit_refresh_token.lock().unwrap() = true;
        self
    }

    /// Number of login calls made.
    #[must_use]
    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    /// Number of logout calls made.
    #[must_use]
    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }
}

#[allow(clippy::unwrap_used)]
impl AuthGateway for MockAuthGateway {
    async fn login(&self, _credentials: Credentials) -> Result<LoginResponse, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.login_failure.lock().unwrap().as_ref() {
            return Err(failure.to_error());
        }
        let refresh_token = if *self.omit_refresh_token.lock().unwrap() {
            None
        } else {
            Some("refresh-1".to_string())
        };
        Ok(LoginResponse {
            access_token: "access-1".to_string(),
            refresh_token,
            user: self.user.lock().unwrap().clone(),
        })
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.logout_failure.lock().unwrap().as_ref() {
            return Err(failure.to_error());
        }
        Ok(())
    }
}

/// In-memory profile store.
///
/// Holds the raw serialized form so tests can seed malformed data and
/// exercise the clear-on-parse-failure path.
#[derive(Clone, Default)]
pub struct MemoryProfileStore {
    raw: Arc<Mutex<Option<String>>>,
}

#[allow(clippy::unwrap_used)]
impl MemoryProfileStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with a profile already persisted.
    #[must_use]
    pub fn with_profile(user: &User) -> Self {
        let store = Self::new();
        ProfileStore::store(&store, user);
        store
    }

    /// Seed the raw stored value directly, bypassing serialization.
    pub fn seed_raw(&self, raw: &str) {
        *self.raw.lock().unwrap() = Some(raw.to_string());
    }

    /// `true` when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.lock().unwrap().is_none()
    }
}

#[allow(clippy::unwrap_used)]
impl ProfileStore for MemoryProfileStore {
    fn load(&self) -> Option<User> {
        let mut raw = self.raw.lock().unwrap();
        let stored = raw.as_ref()?;
        match serde_json::from_str(stored) {
            Ok(user) => Some(user),
            Err(error) => {
                // Malformed stored data is unrecoverable; drop it so the
                // next load starts clean.
                tracing::warn!(%error, "clearing malformed cached profile");
                *raw = None;
                None
            }
        }
    }

    fn store(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(serialized) => *self.raw.lock().unwrap() = Some(serialized),
            Err(error) => tracing::warn!(%error, "failed to serialize profile"),
        }
    }

    fn clear(&self) {
        *self.raw.lock().unwrap() = None;
    }
}
