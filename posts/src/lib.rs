//! # Lectern Posts
//!
//! The posts cache: a reducer over [`PostsState`] with a 5-minute advisory
//! TTL, optimistic mutations, and a read-through single-post fetch.
//!
//! Reconciliation rules:
//! - a full-list fetch replaces the cache wholesale and stamps `last_fetch`;
//! - create prepends, update replaces by identity, delete removes by
//!   identity; none of them touch `last_fetch`;
//! - failures surface a message and never wipe cached data;
//! - expiry is advisory: the reducer never auto-refetches, callers consult
//!   `is_cache_valid` (the [`PostsHandle`] does this in `refetch`).
//!
//! ## Example: list + detail
//!
//! ```rust,ignore
//! use lectern_posts::{PostsEnvironment, PostsHandle};
//!
//! let handle = PostsHandle::new(PostsEnvironment::new(gateway, clock));
//! let posts = handle.fetch_list(ListQuery::default()).await?;
//! let view = handle.detail_view(&posts[0].id).await?;
//! // dropping `view` clears the detail state
//! ```

// Public modules
pub mod actions;
pub mod environment;
pub mod handle;
pub mod providers;
pub mod reducer;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use actions::PostsAction;
pub use environment::PostsEnvironment;
pub use handle::{DetailView, HandleError, PostsHandle};
pub use lectern_api::{Comment, ListQuery, NewComment, NewPost, Post, PostPage, PostPatch};
pub use providers::PostsGateway;
pub use reducer::PostsReducer;
pub use state::{CACHE_TTL_MS, PostsState};
