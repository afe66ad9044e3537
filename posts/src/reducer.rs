//! Posts reducer.
//!
//! Owns the cache reconciliation rules: the list is replaced wholesale only
//! by a full fetch, mutations edit it in place by identity, and failures
//! never wipe data that was already there. `last_fetch` moves only on a
//! successful full-list fetch, so optimistic edits never refresh the
//! cache's staleness clock.

use crate::actions::PostsAction;
use crate::environment::PostsEnvironment;
use crate::providers::PostsGateway;
use crate::state::PostsState;
use lectern_core::effect::Effect;
use lectern_core::environment::Clock;
use lectern_core::reducer::Reducer;
use lectern_core::{SmallVec, smallvec};

/// Posts reducer over [`PostsState`].
#[derive(Debug, Clone)]
pub struct PostsReducer<G, C> {
    _phantom: std::marker::PhantomData<(G, C)>,
}

impl<G, C> PostsReducer<G, C> {
    /// Create a new posts reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<G, C> Default for PostsReducer<G, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G, C> Reducer for PostsReducer<G, C>
where
    G: PostsGateway + Clone + 'static,
    C: Clock + Clone + 'static,
{
    type State = PostsState;
    type Action = PostsAction;
    type Environment = PostsEnvironment<G, C>;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Full list fetch: the only path that stamps last_fetch
            // ═══════════════════════════════════════════════════════════════
            PostsAction::FetchList { query } => {
                state.loading = true;
                state.error = None;

                let gateway = env.gateway.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match gateway.list(query).await {
                        Ok(page) => Some(PostsAction::ListFetched { page }),
                        Err(error) => {
                            tracing::warn!(%error, "list fetch failed");
                            Some(PostsAction::ListFetchFailed {
                                message: error.user_message(),
                            })
                        }
                    }
                }))]
            }

            PostsAction::ListFetched { page } => {
                // Wholesale replace, not a merge: entries the server no
                // longer returns disappear from the cache.
                state.posts = page.posts;
                state.last_fetch = Some(env.clock.now());
                state.loading = false;
                state.error = None;
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════════
            // Single fetch: read-through on the in-memory list
            // ═══════════════════════════════════════════════════════════════
            PostsAction::FetchPost { id } => {
                if let Some(hit) = state.get_post_by_id(&id).cloned() {
                    // Served from cache: no network, no loading flicker.
                    state.current_post = Some(hit);
                    state.error = None;
                    return smallvec![Effect::None];
                }

                state.loading = true;
                state.error = None;
                // Cleared up front so the previous post never flashes in
                // the detail view while the fetch is in flight.
                state.current_post = None;

                let gateway = env.gateway.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match gateway.get(id).await {
                        Ok(post) => Some(PostsAction::PostFetched { post }),
                        Err(error) => {
                            tracing::warn!(%error, "post fetch failed");
                            Some(PostsAction::PostFetchFailed {
                                message: error.user_message(),
                            })
                        }
                    }
                }))]
            }

            PostsAction::PostFetched { post } => {
                // Sets the detail view only. The list is reconciled by
                // update/delete, never by a single fetch.
                state.current_post = Some(post);
                state.loading = false;
                state.error = None;
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════════
            // Mutations: optimistic cache edits, last_fetch untouched
            // ═══════════════════════════════════════════════════════════════
            PostsAction::Create { post } => {
                state.loading = true;
                state.error = None;

                let gateway = env.gateway.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match gateway.create(post).await {
                        Ok(post) => Some(PostsAction::Created { post }),
                        Err(error) => {
                            tracing::warn!(%error, "create failed");
                            Some(PostsAction::CreateFailed {
                                message: error.user_message(),
                            })
                        }
                    }
                }))]
            }

            PostsAction::Created { post } => {
                // Most-recent-first.
                state.posts.insert(0, post);
                state.loading = false;
                state.error = None;
                smallvec![Effect::None]
            }

            PostsAction::Update { id, patch } => {
                state.loading = true;
                state.error = None;

                let gateway = env.gateway.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match gateway.update(id, patch).await {
                        Ok(post) => Some(PostsAction::Updated { post }),
                        Err(error) => {
                            tracing::warn!(%error, "update failed");
                            Some(PostsAction::UpdateFailed {
                                message: error.user_message(),
                            })
                        }
                    }
                }))]
            }

            PostsAction::Updated { post } => {
                if let Some(entry) = state.posts.iter_mut().find(|p| p.id == post.id) {
                    *entry = post.clone();
                }
                if state
                    .current_post
                    .as_ref()
                    .is_some_and(|current| current.id == post.id)
                {
                    state.current_post = Some(post);
                }
                state.loading = false;
                state.error = None;
                smallvec![Effect::None]
            }

            PostsAction::Delete { id } => {
                state.loading = true;
                state.error = None;

                let gateway = env.gateway.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match gateway.delete(id.clone()).await {
                        Ok(()) => Some(PostsAction::Deleted { id }),
                        Err(error) => {
                            tracing::warn!(%error, "delete failed");
                            Some(PostsAction::DeleteFailed {
                                message: error.user_message(),
                            })
                        }
                    }
                }))]
            }

            PostsAction::Deleted { id } => {
                state.posts.retain(|post| post.id != id);
                if state
                    .current_post
                    .as_ref()
                    .is_some_and(|current| current.id == id)
                {
                    state.current_post = None;
                }
                state.loading = false;
                state.error = None;
                smallvec![Effect::None]
            }

            // ═══════════════════════════════════════════════════════════════
            // Failures: surface the message, never wipe data
            // ═══════════════════════════════════════════════════════════════
            PostsAction::ListFetchFailed { message }
            | PostsAction::PostFetchFailed { message }
            | PostsAction::CreateFailed { message }
            | PostsAction::UpdateFailed { message }
            | PostsAction::DeleteFailed { message } => {
                state.loading = false;
                state.error = Some(message);
                smallvec![Effect::None]
            }

            PostsAction::ClearError => {
                state.error = None;
                smallvec![Effect::None]
            }

            PostsAction::ClearCurrent => {
                state.current_post = None;
                smallvec![Effect::None]
            }
        }
    }
}
