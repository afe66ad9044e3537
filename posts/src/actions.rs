//! Posts actions.
//!
//! Each remote operation has a command (dispatched by callers) and a pair
//! of terminal events (produced by the command's effect). Commands set
//! `loading`; terminal events clear it.

use lectern_api::{ListQuery, NewPost, Post, PostPage, PostPatch};

/// Posts action.
#[derive(Debug, Clone)]
pub enum PostsAction {
    /// Fetch the full list from the server.
    FetchList {
        /// Search/pagination parameters.
        query: ListQuery,
    },
    /// List fetch succeeded; replaces the cache wholesale.
    ListFetched {
        /// Normalized page from the gateway.
        page: PostPage,
    },
    /// List fetch failed.
    ListFetchFailed {
        /// User-facing failure message.
        message: String,
    },

    /// Fetch one post for the detail view.
    ///
    /// Read-through: a cache hit by identity is served synchronously with
    /// no network effect and no loading flicker.
    FetchPost {
        /// Post identity.
        id: String,
    },
    /// Single fetch succeeded; sets `current_post` only, never the list.
    PostFetched {
        /// The fetched post.
        post: Post,
    },
    /// Single fetch failed.
    PostFetchFailed {
        /// User-facing failure message.
        message: String,
    },

    /// Create a post.
    Create {
        /// Fields for the new post.
        post: NewPost,
    },
    /// Create succeeded; the new post is prepended to the list.
    Created {
        /// Server-created post.
        post: Post,
    },
    /// Create failed.
    CreateFailed {
        /// User-facing failure message.
        message: String,
    },

    /// Update a post's title and content.
    Update {
        /// Post identity.
        id: String,
        /// Replacement title and content.
        patch: PostPatch,
    },
    /// Update succeeded; the entry is replaced by identity in the list and
    /// in `current_post` when it matches.
    Updated {
        /// Server-updated post.
        post: Post,
    },
    /// Update failed.
    UpdateFailed {
        /// User-facing failure message.
        message: String,
    },

    /// Delete a post.
    Delete {
        /// Post identity.
        id: String,
    },
    /// Delete succeeded; the entry is removed from the list and from
    /// `current_post` when it matches.
    Deleted {
        /// Identity of the removed post.
        id: String,
    },
    /// Delete failed.
    DeleteFailed {
        /// User-facing failure message.
        message: String,
    },

    /// Dismiss the surfaced error.
    ClearError,
    /// Drop `current_post`, e.g. when a detail view unmounts.
    ClearCurrent,
}
