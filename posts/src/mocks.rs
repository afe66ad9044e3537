//! Mock posts gateway for testing.

use crate::providers::PostsGateway;
use lectern_api::{
    ApiError, Comment, ListQuery, NewComment, NewPost, Post, PostPage, PostPatch,
};
use lectern_core::{DateTime, Utc};
use reqwest::StatusCode;
use std::sync::{Arc, Mutex};

fn timestamp() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// A post with deterministic content keyed off its id.
#[must_use]
pub fn sample_post(id: &str) -> Post {
    Post {
        id: id.to_string(),
        title: format!("Title {id}"),
        content: format!("Content of {id}"),
        author: "Ada".to_string(),
        description: None,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

/// A comment on the given post.
#[must_use]
pub fn sample_comment(id: &str, post_id: &str) -> Comment {
    Comment {
        id: id.to_string(),
        post_id: post_id.to_string(),
        author: "Ada".to_string(),
        content: format!("Comment {id}"),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

/// Mock posts gateway.
///
/// Serves a scriptable in-memory set of posts and records every call as a
/// readable string, so tests can assert not just outcomes but which network
/// calls happened (and, for the read-through cache, that none did).
#[derive(Clone, Default)]
pub struct MockPostsGateway {
    posts: Arc<Mutex<Vec<Post>>>,
    comments: Arc<Mutex<Vec<Comment>>>,
    failure: Arc<Mutex<Option<(StatusCode, String)>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

#[allow(clippy::unwrap_used)]
impl MockPostsGateway {
    /// Gateway with no posts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway serving the given posts.
    #[must_use]
    pub fn with_posts(self, posts: Vec<Post>) -> Self {
        *self.posts.lock().unwrap() = posts;
        self
    }

    /// Gateway serving the given comments.
    #[must_use]
    pub fn with_comments(self, comments: Vec<Comment>) -> Self {
        *self.comments.lock().unwrap() = comments;
        self
    }

    /// Script every call to fail with the given status and message.
    #[must_use]
    pub fn failing(self, status: StatusCode, message: &str) -> Self {
        *self.failure.lock().unwrap() = Some((status, message.to_string()));
        self
    }

    /// All calls made so far, as `"name arg"` strings in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn scripted_failure(&self) -> Option<ApiError> {
        self.failure
            .lock()
            .unwrap()
            .as_ref()
            .map(|(status, message)| ApiError::Http {
                status: *status,
                message: message.clone(),
                errors: Vec::new(),
            })
    }

    fn not_found(id: &str) -> ApiError {
        ApiError::Http {
            status: StatusCode::NOT_FOUND,
            message: format!("Post {id} not found"),
            errors: Vec::new(),
        }
    }
}

#[allow(clippy::unwrap_used)]
impl PostsGateway for MockPostsGateway {
    async fn list(&self, _query: ListQuery) -> Result<PostPage, ApiError> {
        self.record("list".to_string());
        if let Some(error) = self.scripted_failure() {
            return Err(error);
        }
        let posts = self.posts.lock().unwrap().clone();
        Ok(PostPage {
            total: posts.len() as u64,
            posts,
        })
    }

    async fn get(&self, id: String) -> Result<Post, ApiError> {
        self.record(format!("get {id}"));
        if let Some(error) = self.scripted_failure() {
            return Err(error);
        }
        self.posts
            .lock()
            .unwrap()
            .iter()
            .find(|post| post.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found(&id))
    }

    async fn create(&self, post: NewPost) -> Result<Post, ApiError> {
        self.record("create".to_string());
        if let Some(error) = self.scripted_failure() {
            return Err(error);
        }
        let count = self.posts.lock().unwrap().len();
        Ok(Post {
            id: format!("p{}", count + 1),
            title: post.title,
            content: post.content,
            author: "Ada".to_string(),
            description: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        })
    }

    async fn update(&self, id: String, patch: PostPatch) -> Result<Post, ApiError> {
        self.record(format!("update {id}"));
        if let Some(error) = self.scripted_failure() {
            return Err(error);
        }
        let base = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|post| post.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found(&id))?;
        Ok(Post {
            title: patch.title,
            content: patch.content,
            ..base
        })
    }

    async fn delete(&self, id: String) -> Result<(), ApiError> {
        self.record(format!("delete {id}"));
        if let Some(error) = self.scripted_failure() {
            return Err(error);
        }
        Ok(())
    }

    async fn comments(&self, post_id: String) -> Result<Vec<Comment>, ApiError> {
        self.record(format!("comments {post_id}"));
        if let Some(error) = self.scripted_failure() {
            return Err(error);
        }
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn create_comment(
        &self,
        post_id: String,
        comment: NewComment,
    ) -> Result<Comment, ApiError> {
        self.record(format!("create_comment {post_id}"));
        if let Some(error) = self.scripted_failure() {
            return Err(error);
        }
        let count = self.comments.lock().unwrap().len();
        Ok(Comment {
            id: format!("c{}", count + 1),
            post_id,
            author: comment.author,
            content: comment.content,
            created_at: timestamp(),
            updated_at: timestamp(),
        })
    }
}
