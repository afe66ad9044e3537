//! Posts gateway and wire types.
//!
//! The list endpoint is the one place the server's response shape is not
//! trustworthy: depending on deployment it answers with a bare array, a
//! single post object, or a `{posts, total}` envelope. The closed set of
//! shapes is modeled as [`ListPayload`] and collapsed into [`PostPage`] in
//! one place; nothing else in the client ever probes response fields.

use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::storage::{CredentialVault, SessionEviction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Character budget for the derived description excerpt.
const DESCRIPTION_CHARS: usize = 150;

/// A post as held by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Stable identity; uniqueness is the server's concern.
    pub id: String,
    /// Post title.
    pub title: String,
    /// Post body, sanitized HTML.
    pub content: String,
    /// Author display name; server-owned.
    pub author: String,
    /// List-view excerpt. Server-optional; derived from `content` when
    /// absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Server-owned creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Server-owned last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A comment on a post. Append-only from the client's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Stable identity.
    pub id: String,
    /// Owning post.
    pub post_id: String,
    /// Comment author display name.
    pub author: String,
    /// Comment body.
    pub content: String,
    /// Server-owned creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Server-owned last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Body for `POST /posts`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Authoring user id.
    pub author_id: String,
}

/// Body for `PUT /posts/:id`. Author and timestamps are server-owned.
#[derive(Debug, Clone, Serialize)]
pub struct PostPatch {
    /// New title.
    pub title: String,
    /// New body.
    pub content: String,
}

/// Body for `POST /posts/:id/comments`.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    /// Comment body.
    pub content: String,
    /// Comment author display name.
    pub author: String,
}

/// Query parameters for the list endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListQuery {
    /// Full-text search term.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// 1-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListQuery {
    /// Query for one page of results.
    #[must_use]
    pub const fn page(page: u32, limit: u32) -> Self {
        Self {
            search: None,
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Restrict results to a search term.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    fn to_path(&self) -> Result<String> {
        let query =
            serde_urlencoded::to_string(self).map_err(|err| ApiError::Decode(err.to_string()))?;
        if query.is_empty() {
            Ok("/posts".to_string())
        } else {
            Ok(format!("/posts?{query}"))
        }
    }
}

/// Normalized list result: always a list plus a total, whatever the server
/// sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPage {
    /// Posts in server order.
    pub posts: Vec<Post>,
    /// Total matching posts. Computed from the list when the server did not
    /// send one.
    pub total: u64,
}

/// The closed set of shapes the list endpoint is known to produce.
///
/// Variant order is the normalization priority: bare array, then a single
/// entity-shaped object, then the `{posts, total}` envelope. Anything else
/// falls through to [`ListPayload::Other`] and yields an empty page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListPayload {
    Many(Vec<Post>),
    One(Post),
    Envelope {
        posts: Vec<Post>,
        #[serde(default)]
        total: Option<u64>,
    },
    Other(serde_json::Value),
}

impl From<ListPayload> for PostPage {
    fn from(payload: ListPayload) -> Self {
        match payload {
            ListPayload::Many(posts) => Self {
                total: posts.len() as u64,
                posts,
            },
            ListPayload::One(post) => Self {
                posts: vec![post],
                total: 1,
            },
            ListPayload::Envelope { posts, total } => Self {
                total: total.unwrap_or(posts.len() as u64),
                posts,
            },
            ListPayload::Other(value) => {
                tracing::warn!(?value, "unrecognized list payload shape, treating as empty");
                Self {
                    posts: Vec::new(),
                    total: 0,
                }
            },
        }
    }
}

/// First [`DESCRIPTION_CHARS`] characters of `content` plus an ellipsis.
///
/// No word-boundary trimming; cuts are char-boundary safe for UTF-8.
fn excerpt(content: &str) -> String {
    let mut out: String = content.chars().take(DESCRIPTION_CHARS).collect();
    out.push_str("...");
    out
}

/// Fill in a derived description when the server omitted one.
fn with_description(mut post: Post) -> Post {
    if post.description.is_none() {
        post.description = Some(excerpt(&post.content));
    }
    post
}

/// Gateway for the `/posts` endpoints.
pub struct PostsApi<V, X> {
    client: Arc<ApiClient<V, X>>,
}

impl<V, X> Clone for PostsApi<V, X> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<V, X> PostsApi<V, X>
where
    V: CredentialVault,
    X: SessionEviction,
{
    /// Create the gateway over a shared adapter.
    #[must_use]
    pub fn new(client: Arc<ApiClient<V, X>>) -> Self {
        Self { client }
    }

    /// `GET /posts?search&page&limit`, normalized to a [`PostPage`].
    ///
    /// # Errors
    ///
    /// Propagates the adapter's [`ApiError`] unchanged.
    pub async fn list(&self, query: &ListQuery) -> Result<PostPage> {
        let payload: ListPayload = self.client.get(&query.to_path()?).await?;
        let mut page = PostPage::from(payload);
        page.posts = page.posts.into_iter().map(with_description).collect();
        Ok(page)
    }

    /// `GET /posts/:id`.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's [`ApiError`] unchanged; 404 stays a 404 for
    /// the caller's not-found branch.
    pub async fn get(&self, id: &str) -> Result<Post> {
        let post = self.client.get(&format!("/posts/{id}")).await?;
        Ok(with_description(post))
    }

    /// `POST /posts`.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's [`ApiError`] unchanged.
    pub async fn create(&self, post: &NewPost) -> Result<Post> {
        let created = self.client.post("/posts", post).await?;
        Ok(with_description(created))
    }

    /// `PUT /posts/:id`.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's [`ApiError`] unchanged.
    pub async fn update(&self, id: &str, patch: &PostPatch) -> Result<Post> {
        let updated = self.client.put(&format!("/posts/{id}"), patch).await?;
        Ok(with_description(updated))
    }

    /// `DELETE /posts/:id`. No payload on success.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's [`ApiError`] unchanged.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("/posts/{id}")).await
    }

    /// `GET /posts/:id/comments`. There is no client-side comment cache;
    /// every post view reloads the full list.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's [`ApiError`] unchanged.
    pub async fn comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        self.client.get(&format!("/posts/{post_id}/comments")).await
    }

    /// `POST /posts/:id/comments`.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's [`ApiError`] unchanged.
    pub async fn create_comment(&self, post_id: &str, comment: &NewComment) -> Result<Comment> {
        self.client
            .post(&format!("/posts/{post_id}/comments"), comment)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn post_json(id: &str, content: &str) -> String {
        format!(
            r#"{{"id":"{id}","title":"A","content":"{content}","author":"x",
                "createdAt":"2025-01-01T00:00:00Z","updatedAt":"2025-01-01T00:00:00Z"}}"#
        )
    }

    fn normalize(json: &str) -> PostPage {
        let payload: ListPayload = serde_json::from_str(json).unwrap();
        let mut page = PostPage::from(payload);
        page.posts = page.posts.into_iter().map(with_description).collect();
        page
    }

    #[test]
    fn test_bare_array_is_wrapped_with_computed_total() {
        let long_content = "0123456789".repeat(20); // 200 chars
        let page = normalize(&format!("[{}]", post_json("1", &long_content)));

        assert_eq!(page.total, 1);
        assert_eq!(page.posts.len(), 1);
        let description = page.posts[0].description.as_deref().unwrap();
        assert_eq!(description.chars().count(), 153);
        assert!(description.starts_with(&long_content[..150]));
        assert!(description.ends_with("..."));
    }

    #[test]
    fn test_single_object_becomes_one_element_page() {
        let page = normalize(&post_json("7", "hello"));
        assert_eq!(page.total, 1);
        assert_eq!(page.posts[0].id, "7");
    }

    #[test]
    fn test_envelope_passes_through_with_server_total() {
        let page = normalize(&format!(
            r#"{{"posts":[{}],"total":42}}"#,
            post_json("1", "hello")
        ));
        assert_eq!(page.total, 42);
        assert_eq!(page.posts.len(), 1);
    }

    #[test]
    fn test_envelope_without_total_counts_posts() {
        let page = normalize(&format!(r#"{{"posts":[{}]}}"#, post_json("1", "hi")));
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_unrecognized_shape_yields_empty_page() {
        let page = normalize(r#"{"unexpected": true}"#);
        assert!(page.posts.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_server_description_is_preserved() {
        let json = r#"{"id":"1","title":"A","content":"body","author":"x",
            "description":"server says so",
            "createdAt":"2025-01-01T00:00:00Z","updatedAt":"2025-01-01T00:00:00Z"}"#;
        let page = normalize(json);
        assert_eq!(page.posts[0].description.as_deref(), Some("server says so"));
    }

    #[test]
    fn test_excerpt_is_char_boundary_safe() {
        let content = "é".repeat(200);
        let out = excerpt(&content);
        assert_eq!(out.chars().count(), 153);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_list_query_path() {
        let query = ListQuery::page(2, 10).with_search("rust");
        assert_eq!(query.to_path().unwrap(), "/posts?search=rust&page=2&limit=10");

        let empty = ListQuery::default();
        assert_eq!(empty.to_path().unwrap(), "/posts");
    }
}
