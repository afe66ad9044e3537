//! # Lectern API
//!
//! HTTP client adapter and resource gateways for the Lectern client-side
//! data layer.
//!
//! The adapter ([`ApiClient`]) wraps `reqwest` with:
//! - a configured base URL,
//! - a request step that attaches `Authorization: Bearer <access token>`
//!   from the credential vault,
//! - a response step that, on `401`, performs exactly one token refresh and
//!   replays the original request. The retry budget is an explicit
//!   parameter threaded through the pipeline, bounded at 1.
//!
//! The gateways ([`PostsApi`], [`AuthApi`]) map domain operations 1:1 onto
//! endpoint calls and normalize the heterogeneous list-response shapes the
//! server is known to produce into a single [`PostPage`].
//!
//! Gateways never swallow errors: every failure propagates as an
//! [`ApiError`] for the state containers to interpret.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod posts;
pub mod storage;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use auth::{AuthApi, Credentials, LoginResponse, RefreshResponse, Role, User};
pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use posts::{Comment, ListQuery, NewComment, NewPost, Post, PostPage, PostPatch, PostsApi};
pub use storage::{CredentialVault, NoopEviction, SessionEviction};
