//! Posts cache state.

use chrono::Duration;
use lectern_api::Post;
use lectern_core::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How long a full-list fetch stays fresh, in milliseconds.
pub const CACHE_TTL_MS: i64 = 300_000;

/// Cached posts state managed by the posts reducer.
///
/// `last_fetch` is stamped only by a successful full-list fetch. Create,
/// update, and delete mutate the cache in place without touching it, so
/// optimistic edits never extend (or shorten) the cache's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostsState {
    /// Posts in the order the server returned them on the last full fetch,
    /// with created posts prepended since.
    pub posts: Vec<Post>,

    /// Post shown in the detail view, if any.
    pub current_post: Option<Post>,

    /// An operation is in flight.
    pub loading: bool,

    /// Message from the last failed operation.
    pub error: Option<String>,

    /// When the list was last replaced wholesale. `None` until the first
    /// successful list fetch.
    pub last_fetch: Option<DateTime<Utc>>,
}

impl PostsState {
    /// `true` while the last full-list fetch is younger than
    /// [`CACHE_TTL_MS`]. `false` when no fetch has happened yet.
    ///
    /// Advisory only: nothing in the container refetches on expiry, and
    /// stale data keeps being served until a caller decides otherwise.
    #[must_use]
    pub fn is_cache_valid(&self, now: DateTime<Utc>) -> bool {
        self.last_fetch
            .is_some_and(|t| now - t < Duration::milliseconds(CACHE_TTL_MS))
    }

    /// Pure synchronous lookup by identity. No side effects.
    #[must_use]
    pub fn get_post_by_id(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_cache_invalid_before_first_fetch() {
        let state = PostsState::default();
        assert!(!state.is_cache_valid(at(0)));
    }

    #[test]
    fn test_cache_valid_strictly_inside_ttl() {
        let state = PostsState {
            last_fetch: Some(at(0)),
            ..PostsState::default()
        };
        assert!(state.is_cache_valid(at(0)));
        assert!(state.is_cache_valid(at(299)));
        // Exactly at the TTL boundary the cache is stale.
        assert!(!state.is_cache_valid(at(300)));
        assert!(!state.is_cache_valid(at(400)));
    }

    #[test]
    fn test_lookup_is_by_identity() {
        let mut state = PostsState::default();
        assert!(state.get_post_by_id("p1").is_none());

        state.posts = vec![crate::mocks::sample_post("p1"), crate::mocks::sample_post("p2")];
        assert_eq!(state.get_post_by_id("p2").map(|p| p.id.as_str()), Some("p2"));
        assert!(state.get_post_by_id("p9").is_none());
    }
}
