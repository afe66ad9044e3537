//! Client-side credential storage traits.
//!
//! The original storage split is preserved: the access token lives in
//! short-lived (tab-scoped) storage, the refresh token in durable
//! (origin-scoped) storage. Both are cleared together on logout or
//! unrecoverable refresh failure.
//!
//! Storage writes are infallible by contract: the layer this models
//! swallowed storage errors rather than surfacing them, so implementations
//! log and drop failures internally.

/// Storage for the token pair the HTTP adapter needs.
pub trait CredentialVault: Send + Sync {
    /// Current access token, if any.
    fn access_token(&self) -> Option<String>;

    /// Persist a freshly minted access token (short-lived storage).
    fn set_access_token(&self, token: &str);

    /// Current refresh token, if any.
    fn refresh_token(&self) -> Option<String>;

    /// Persist a refresh token (durable storage).
    fn set_refresh_token(&self, token: &str);

    /// Clear both tokens.
    fn clear(&self);
}

/// Hook invoked when the session is evicted by the HTTP adapter.
///
/// Eviction happens when a 401 cannot be recovered: no refresh token
/// exists, or the refresh call itself failed. Implementations clear any
/// remaining session state (the cached profile) and perform the
/// redirect-to-login navigation. Modeled as a trait so the side effect is
/// observable in tests.
pub trait SessionEviction: Send + Sync {
    /// Tear down the session.
    fn evict(&self);
}

/// Eviction hook that does nothing.
///
/// For tools and tests that talk to unauthenticated endpoints only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEviction;

impl SessionEviction for NoopEviction {
    fn evict(&self) {}
}

impl<T: CredentialVault + ?Sized> CredentialVault for std::sync::Arc<T> {
    fn access_token(&self) -> Option<String> {
        (**self).access_token()
    }

    fn set_access_token(&self, token: &str) {
        (**self).set_access_token(token);
    }

    fn refresh_token(&self) -> Option<String> {
        (**self).refresh_token()
    }

    fn set_refresh_token(&self, token: &str) {
        (**self).set_refresh_token(token);
    }

    fn clear(&self) {
        (**self).clear();
    }
}

impl<T: SessionEviction + ?Sized> SessionEviction for std::sync::Arc<T> {
    fn evict(&self) {
        (**self).evict();
    }
}
