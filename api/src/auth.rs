//! Authentication gateway and wire types.
//!
//! Thin 1:1 mappings onto the `/auth/*` endpoints. Token persistence is not
//! done here: the session reducer owns what gets written where.

use crate::client::ApiClient;
use crate::error::Result;
use crate::storage::{CredentialVault, SessionEviction};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Role attached to an authenticated user.
///
/// Gates the create/edit/delete surface: students read, teachers and admins
/// manage posts, admins additionally see the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only participant.
    Student,
    /// Can create, edit, and delete posts. The server calls this role
    /// either `teacher` or `professor` depending on deployment.
    #[serde(alias = "professor")]
    Teacher,
    /// Full capability, including the admin panel.
    Admin,
}

impl Role {
    /// `true` when this role may create, edit, or delete posts.
    #[must_use]
    pub const fn can_manage_posts(self) -> bool {
        matches!(self, Self::Teacher | Self::Admin)
    }

    /// `true` for the admin role.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Authenticated user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable user identity.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Capability role.
    pub role: Role,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Short-lived access token.
    pub access_token: String,
    /// Durable refresh token; some deployments omit it.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Authenticated user profile.
    pub user: User,
}

/// Refresh request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh response payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// Newly minted access token.
    pub access_token: String,
    /// Rotated refresh token, when the server rotates.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Gateway for the `/auth/*` endpoints.
pub struct AuthApi<V, X> {
    client: Arc<ApiClient<V, X>>,
}

impl<V, X> Clone for AuthApi<V, X> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<V, X> AuthApi<V, X>
where
    V: CredentialVault,
    X: SessionEviction,
{
    /// Create the gateway over a shared adapter.
    #[must_use]
    pub fn new(client: Arc<ApiClient<V, X>>) -> Self {
        Self { client }
    }

    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's [`crate::ApiError`] unchanged; a 401 here
    /// means bad credentials, not an expired session.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.client.post("/auth/login", credentials).await
    }

    /// `POST /auth/logout`.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's [`crate::ApiError`]; callers treat failure
    /// as non-fatal and clear local state regardless.
    pub async fn logout(&self) -> Result<()> {
        self.client.post_empty("/auth/logout").await
    }

    /// `POST /auth/refresh`, explicitly.
    ///
    /// The adapter performs refresh transparently inside its pipeline; this
    /// entry point exists for callers that manage tokens themselves.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's [`crate::ApiError`] unchanged.
    pub async fn refresh(&self, refresh_token: String) -> Result<RefreshResponse> {
        self.client
            .post("/auth/refresh", &RefreshRequest { refresh_token })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_accepts_professor_alias() {
        let role: Role = serde_json::from_str("\"professor\"").unwrap();
        assert_eq!(role, Role::Teacher);
        let role: Role = serde_json::from_str("\"teacher\"").unwrap();
        assert_eq!(role, Role::Teacher);
    }

    #[test]
    fn test_role_capability_gate() {
        assert!(!Role::Student.can_manage_posts());
        assert!(Role::Teacher.can_manage_posts());
        assert!(Role::Admin.can_manage_posts());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Teacher.is_admin());
    }

    #[test]
    fn test_login_response_tolerates_missing_refresh_token() {
        let json = r#"{
            "accessToken": "at-1",
            "user": {"id": "u1", "name": "Ada", "email": "ada@example.com", "role": "teacher"}
        }"#;
        let parsed: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.access_token, "at-1");
        assert!(parsed.refresh_token.is_none());
        assert_eq!(parsed.user.role, Role::Teacher);
    }
}
