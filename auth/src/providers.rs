//! Provider traits for the session reducer's dependencies.

use lectern_api::{
    ApiError, AuthApi, CredentialVault, Credentials, LoginResponse, SessionEviction, User,
};
use std::future::Future;

/// Gateway to the remote auth endpoints.
///
/// Implemented by [`lectern_api::AuthApi`] in production and by a mock in
/// tests. Gateway calls propagate [`ApiError`] unchanged.
pub trait AuthGateway: Send + Sync {
    /// `POST /auth/login`.
    fn login(
        &self,
        credentials: Credentials,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>> + Send;

    /// `POST /auth/logout`.
    fn logout(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
}

impl<V, X> AuthGateway for AuthApi<V, X>
where
    V: CredentialVault + 'static,
    X: SessionEviction + 'static,
{
    async fn login(&self, credentials: Credentials) -> Result<LoginResponse, ApiError> {
        AuthApi::login(self, &credentials).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        AuthApi::logout(self).await
    }
}

/// Durable storage for the cached user profile.
///
/// Same infallible contract as the credential vault: the storage layer this
/// models swallowed write errors. Malformed stored data is a `load` concern:
/// implementations clear it and report `None`, never an error.
pub trait ProfileStore: Send + Sync {
    /// Load the cached profile. Malformed data is cleared and reported as
    /// absent.
    fn load(&self) -> Option<User>;

    /// Persist the profile.
    fn store(&self, user: &User);

    /// Remove the cached profile.
    fn clear(&self);
}

impl<T: ProfileStore + ?Sized> ProfileStore for std::sync::Arc<T> {
    fn load(&self) -> Option<User> {
        (**self).load()
    }

    fn store(&self, user: &User) {
        (**self).store(user);
    }

    fn clear(&self) {
        (**self).clear();
    }
}
