//! Provider trait for the posts reducer's gateway dependency.

use lectern_api::{
    ApiError, Comment, CredentialVault, ListQuery, NewComment, NewPost, Post, PostPage, PostPatch,
    PostsApi, SessionEviction,
};
use std::future::Future;

/// Gateway to the `/posts` endpoints.
///
/// Implemented by [`lectern_api::PostsApi`] in production and by a mock in
/// tests. Calls propagate [`ApiError`] unchanged; interpreting status codes
/// into user-facing copy is the caller's concern.
pub trait PostsGateway: Send + Sync {
    /// `GET /posts`, normalized.
    fn list(&self, query: ListQuery) -> impl Future<Output = Result<PostPage, ApiError>> + Send;

    /// `GET /posts/:id`.
    fn get(&self, id: String) -> impl Future<Output = Result<Post, ApiError>> + Send;

    /// `POST /posts`.
    fn create(&self, post: NewPost) -> impl Future<Output = Result<Post, ApiError>> + Send;

    /// `PUT /posts/:id`.
    fn update(
        &self,
        id: String,
        patch: PostPatch,
    ) -> impl Future<Output = Result<Post, ApiError>> + Send;

    /// `DELETE /posts/:id`.
    fn delete(&self, id: String) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `GET /posts/:id/comments`.
    fn comments(&self, post_id: String)
    -> impl Future<Output = Result<Vec<Comment>, ApiError>> + Send;

    /// `POST /posts/:id/comments`.
    fn create_comment(
        &self,
        post_id: String,
        comment: NewComment,
    ) -> impl Future<Output = Result<Comment, ApiError>> + Send;
}

impl<V, X> PostsGateway for PostsApi<V, X>
where
    V: CredentialVault + 'static,
    X: SessionEviction + 'static,
{
    async fn list(&self, query: ListQuery) -> Result<PostPage, ApiError> {
        PostsApi::list(self, &query).await
    }

    async fn get(&self, id: String) -> Result<Post, ApiError> {
        PostsApi::get(self, &id).await
    }

    async fn create(&self, post: NewPost) -> Result<Post, ApiError> {
        PostsApi::create(self, &post).await
    }

    async fn update(&self, id: String, patch: PostPatch) -> Result<Post, ApiError> {
        PostsApi::update(self, &id, &patch).await
    }

    async fn delete(&self, id: String) -> Result<(), ApiError> {
        PostsApi::delete(self, &id).await
    }

    async fn comments(&self, post_id: String) -> Result<Vec<Comment>, ApiError> {
        PostsApi::comments(self, &post_id).await
    }

    async fn create_comment(
        &self,
        post_id: String,
        comment: NewComment,
    ) -> Result<Comment, ApiError> {
        PostsApi::create_comment(self, &post_id, &comment).await
    }
}
