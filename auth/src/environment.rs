//! Session environment.
//!
//! Dependency injection for the session reducer: the auth gateway plus the
//! two storage tiers. Built explicitly by the application and passed into
//! the store, never reached as an ambient global.

use crate::providers::{AuthGateway, ProfileStore};
use lectern_api::CredentialVault;

/// Session environment.
///
/// # Type Parameters
///
/// - `G`: auth gateway
/// - `V`: credential vault (access + refresh tokens)
/// - `P`: profile store (durable cached user profile)
#[derive(Clone)]
pub struct SessionEnvironment<G, V, P>
where
    G: AuthGateway + Clone,
    V: CredentialVault + Clone,
    P: ProfileStore + Clone,
{
    /// Remote auth endpoints.
    pub auth: G,

    /// Token storage (short-lived access, durable refresh).
    pub vault: V,

    /// Durable cached user profile.
    pub profiles: P,
}

impl<G, V, P> SessionEnvironment<G, V, P>
where
    G: AuthGateway + Clone,
    V: CredentialVault + Clone,
    P: ProfileStore + Clone,
{
    /// Create a new session environment.
    #[must_use]
    pub const fn new(auth: G, vault: V, profiles: P) -> Self {
        Self {
            auth,
            vault,
            profiles,
        }
    }
}
