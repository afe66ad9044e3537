//! # Lectern Testing
//!
//! Testing utilities and helpers for the Lectern client-side data layer.
//!
//! This crate provides:
//! - A controllable clock for cache-TTL tests
//! - A fluent Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use lectern_testing::{ReducerTest, test_clock};
//!
//! ReducerTest::new(PostsReducer::new())
//!     .with_env(test_environment())
//!     .given_state(PostsState::default())
//!     .when_action(PostsAction::ClearError)
//!     .then_state(|state| assert!(state.error.is_none()))
//!     .run();
//! ```

use chrono::{DateTime, Duration, Utc};
use lectern_core::environment::Clock;


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Duration, Utc};
    use std::sync::{Arc, Mutex};

    /// Controllable clock for deterministic tests.
    ///
    /// Returns the same instant until `set` or `advance` moves it, so cache
    /// staleness can be tested without sleeping.
    ///
    /// # Example
    ///
    /// ```
    /// use lectern_testing::mocks::FixedClock;
    /// use lectern_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let before = clock.now();
    /// clock.advance(Duration::minutes(6));
    /// assert_eq!(clock.now() - before, Duration::minutes(6));
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time.
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock to an absolute instant.
        ///
        /// # Panics
        ///
        /// Panics if the internal mutex is poisoned.
        #[allow(clippy::unwrap_used)]
        pub fn set(&self, time: DateTime<Utc>) {
            *self.time.lock().unwrap() = time;
        }

        /// Advance the clock by a duration.
        ///
        /// # Panics
        ///
        /// Panics if the internal mutex is poisoned.
        #[allow(clippy::unwrap_used)]
        pub fn advance(&self, by: Duration) {
            let mut time = self.time.lock().unwrap();
            *time += by;
        }
    }

    impl Clock for FixedClock {
        #[allow(clippy::unwrap_used)]
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap()
        }
    }
}

/// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC).
///
/// # Panics
///
/// Panics if the hardcoded timestamp fails to parse, which should never
/// happen in practice.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_clock() -> mocks::FixedClock {
    mocks::FixedClock::new(
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc),
    )
}

// Re-export commonly used items
pub use mocks::FixedClock;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_stable() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_fixed_clock_advance() {
        let clock = test_clock();
        let before = clock.now();
        clock.advance(Duration::milliseconds(300_001));
        assert_eq!(clock.now() - before, Duration::milliseconds(300_001));
    }
}
