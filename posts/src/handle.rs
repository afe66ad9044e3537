//! Ergonomic wrapper over the posts store.
//!
//! `PostsHandle` plays the role the list/detail convenience hooks play in
//! the UI layer: it dispatches the command, waits for the matching terminal
//! event, and hands back a `Result`. Cache-expiry policy lives here too,
//! because expiry is advisory: the reducer never refetches on its own, the
//! handle decides when staleness warrants a new fetch.
//!
//! Comments go through the gateway directly. There is no client-side
//! comment cache, so there is nothing for the reducer to own.

use crate::actions::PostsAction;
use crate::environment::PostsEnvironment;
use crate::providers::PostsGateway;
use crate::reducer::PostsReducer;
use crate::state::PostsState;
use lectern_api::{ApiError, Comment, ListQuery, NewComment, NewPost, Post, PostPatch};
use lectern_core::environment::Clock;
use lectern_runtime::{Store, StoreError};
use std::time::Duration;
use thiserror::Error;

/// How long to wait for a terminal event before giving up.
const OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure of a handle operation.
#[derive(Debug, Error)]
pub enum HandleError {
    /// The operation's effect completed with a failure event.
    #[error("{message}")]
    Operation {
        /// User-facing message carried by the failure event.
        message: String,
    },

    /// The store never produced a terminal event.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl HandleError {
    fn operation(message: impl Into<String>) -> Self {
        Self::Operation {
            message: message.into(),
        }
    }
}

type PostsStore<G, C> =
    Store<PostsState, PostsAction, PostsEnvironment<G, C>, PostsReducer<G, C>>;

/// Handle over a posts store instance.
pub struct PostsHandle<G, C>
where
    G: PostsGateway + Clone + Send + Sync + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    store: PostsStore<G, C>,
    gateway: G,
    clock: C,
}

impl<G, C> Clone for PostsHandle<G, C>
where
    G: PostsGateway + Clone + Send + Sync + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            gateway: self.gateway.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<G, C> PostsHandle<G, C>
where
    G: PostsGateway + Clone + Send + Sync + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    /// Create a handle with an empty cache.
    #[must_use]
    pub fn new(environment: PostsEnvironment<G, C>) -> Self {
        let gateway = environment.gateway.clone();
        let clock = environment.clock.clone();
        Self {
            store: Store::new(PostsState::default(), PostsReducer::new(), environment),
            gateway,
            clock,
        }
    }

    /// The underlying store, for callers that need raw dispatch or
    /// subscription.
    #[must_use]
    pub const fn store(&self) -> &PostsStore<G, C> {
        &self.store
    }

    /// Fetch the full list, replacing the cache wholesale.
    ///
    /// # Errors
    ///
    /// [`HandleError::Operation`] when the fetch fails;
    /// [`HandleError::Store`] when no terminal event arrives in time.
    pub async fn fetch_list(&self, query: ListQuery) -> Result<Vec<Post>, HandleError> {
        let outcome = self
            .store
            .send_and_wait_for(
                PostsAction::FetchList { query },
                |action| {
                    matches!(
                        action,
                        PostsAction::ListFetched { .. } | PostsAction::ListFetchFailed { .. }
                    )
                },
                OPERATION_TIMEOUT,
            )
            .await?;

        match outcome {
            PostsAction::ListFetchFailed { message } => Err(HandleError::operation(message)),
            _ => Ok(self.store.state(|s| s.posts.clone()).await),
        }
    }

    /// Fetch the list only when the cache is missing or stale.
    ///
    /// Expiry is advisory and enforced here, not in the reducer: a valid
    /// cache short-circuits with the cached list and no network call.
    ///
    /// # Errors
    ///
    /// Same as [`PostsHandle::fetch_list`].
    pub async fn refetch(&self, query: ListQuery) -> Result<Vec<Post>, HandleError> {
        let now = self.clock.now();
        if self.store.state(|s| s.is_cache_valid(now)).await {
            return Ok(self.store.state(|s| s.posts.clone()).await);
        }
        self.fetch_list(query).await
    }

    /// Fetch one post, serving a cache hit synchronously.
    ///
    /// On a hit the reducer sets `current_post` with no network call; on a
    /// miss this waits for the fetch to complete.
    ///
    /// # Errors
    ///
    /// [`HandleError::Operation`] when the fetch fails (a 404 keeps its
    /// not-found message); [`HandleError::Store`] on timeout.
    pub async fn fetch_post(&self, id: &str) -> Result<Post, HandleError> {
        let hit = self.store.state(|s| s.get_post_by_id(id).is_some()).await;

        if hit {
            // The reducer serves the hit under the same write lock as the
            // dispatch, so the state read below observes it.
            self.store
                .send(PostsAction::FetchPost { id: id.to_string() })
                .await
                .wait()
                .await;
        } else {
            let outcome = self
                .store
                .send_and_wait_for(
                    PostsAction::FetchPost { id: id.to_string() },
                    |action| {
                        matches!(
                            action,
                            PostsAction::PostFetched { .. } | PostsAction::PostFetchFailed { .. }
                        )
                    },
                    OPERATION_TIMEOUT,
                )
                .await?;
            if let PostsAction::PostFetchFailed { message } = outcome {
                return Err(HandleError::operation(message));
            }
        }

        self.store
            .state(|s| s.current_post.clone())
            .await
            .ok_or_else(|| HandleError::operation("The requested resource was not found."))
    }

    /// Create a post. The cache prepends it without touching `last_fetch`.
    ///
    /// # Errors
    ///
    /// [`HandleError::Operation`] on failure, [`HandleError::Store`] on
    /// timeout.
    pub async fn create(&self, post: NewPost) -> Result<Post, HandleError> {
        let outcome = self
            .store
            .send_and_wait_for(
                PostsAction::Create { post },
                |action| {
                    matches!(
                        action,
                        PostsAction::Created { .. } | PostsAction::CreateFailed { .. }
                    )
                },
                OPERATION_TIMEOUT,
            )
            .await?;

        match outcome {
            PostsAction::Created { post } => Ok(post),
            PostsAction::CreateFailed { message } => Err(HandleError::operation(message)),
            _ => Err(HandleError::from(StoreError::ChannelClosed)),
        }
    }

    /// Update a post's title and content.
    ///
    /// # Errors
    ///
    /// [`HandleError::Operation`] on failure, [`HandleError::Store`] on
    /// timeout.
    pub async fn update(&self, id: &str, patch: PostPatch) -> Result<Post, HandleError> {
        let outcome = self
            .store
            .send_and_wait_for(
                PostsAction::Update {
                    id: id.to_string(),
                    patch,
                },
                |action| {
                    matches!(
                        action,
                        PostsAction::Updated { .. } | PostsAction::UpdateFailed { .. }
                    )
                },
                OPERATION_TIMEOUT,
            )
            .await?;

        match outcome {
            PostsAction::Updated { post } => Ok(post),
            PostsAction::UpdateFailed { message } => Err(HandleError::operation(message)),
            _ => Err(HandleError::from(StoreError::ChannelClosed)),
        }
    }

    /// Delete a post.
    ///
    /// # Errors
    ///
    /// [`HandleError::Operation`] on failure, [`HandleError::Store`] on
    /// timeout.
    pub async fn delete(&self, id: &str) -> Result<(), HandleError> {
        let target = id.to_string();
        let outcome = self
            .store
            .send_and_wait_for(
                PostsAction::Delete { id: id.to_string() },
                move |action| match action {
                    PostsAction::Deleted { id } => *id == target,
                    PostsAction::DeleteFailed { .. } => true,
                    _ => false,
                },
                OPERATION_TIMEOUT,
            )
            .await?;

        match outcome {
            PostsAction::DeleteFailed { message } => Err(HandleError::operation(message)),
            _ => Ok(()),
        }
    }

    /// Dismiss the surfaced error.
    pub async fn clear_error(&self) {
        self.store.send(PostsAction::ClearError).await.wait().await;
    }

    /// Current cache snapshot of the list.
    pub async fn posts(&self) -> Vec<Post> {
        self.store.state(|s| s.posts.clone()).await
    }

    /// Current detail-view post, if any.
    pub async fn current_post(&self) -> Option<Post> {
        self.store.state(|s| s.current_post.clone()).await
    }

    /// Currently surfaced error, if any.
    pub async fn error(&self) -> Option<String> {
        self.store.state(|s| s.error.clone()).await
    }

    /// `true` while the last full-list fetch is still fresh.
    pub async fn is_cache_valid(&self) -> bool {
        let now = self.clock.now();
        self.store.state(|s| s.is_cache_valid(now)).await
    }

    /// Open the detail view for a post.
    ///
    /// Fetches the post (read-through) and returns a guard that clears
    /// `current_post` when dropped, so a stale detail never leaks into the
    /// next mounted view.
    ///
    /// # Errors
    ///
    /// Same as [`PostsHandle::fetch_post`].
    pub async fn detail_view(&self, id: &str) -> Result<DetailView<G, C>, HandleError> {
        let post = self.fetch_post(id).await?;
        Ok(DetailView {
            store: self.store.clone(),
            post,
        })
    }

    /// Load the full comment list for a post. Uncached: every call goes to
    /// the server.
    ///
    /// # Errors
    ///
    /// Propagates the gateway's [`ApiError`] unchanged.
    pub async fn comments(&self, post_id: &str) -> Result<Vec<Comment>, ApiError> {
        self.gateway.comments(post_id.to_string()).await
    }

    /// Add a comment to a post. Comments are append-only from the client.
    ///
    /// # Errors
    ///
    /// Propagates the gateway's [`ApiError`] unchanged.
    pub async fn add_comment(
        &self,
        post_id: &str,
        comment: NewComment,
    ) -> Result<Comment, ApiError> {
        self.gateway
            .create_comment(post_id.to_string(), comment)
            .await
    }
}

/// Guard over an open detail view.
///
/// Dropping it dispatches `ClearCurrent` on a background task, mirroring
/// the unmount cleanup of the detail hook.
pub struct DetailView<G, C>
where
    G: PostsGateway + Clone + Send + Sync + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    store: PostsStore<G, C>,
    post: Post,
}

impl<G, C> DetailView<G, C>
where
    G: PostsGateway + Clone + Send + Sync + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    /// The post this view is showing.
    #[must_use]
    pub const fn post(&self) -> &Post {
        &self.post
    }
}

impl<G, C> Drop for DetailView<G, C>
where
    G: PostsGateway + Clone + Send + Sync + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        // Outside a runtime there is nothing to clean up for.
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let store = self.store.clone();
            runtime.spawn(async move {
                store.send(PostsAction::ClearCurrent).await.detach();
            });
        }
    }
}
