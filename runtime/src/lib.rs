//! # Lectern Runtime
//!
//! Store runtime for the Lectern client-side data layer.
//!
//! The Store coordinates the `action → reducer → effects → action` feedback
//! loop: state lives behind a `tokio` `RwLock`, every mutation flows through
//! the reducer under the write lock, and effects returned by the reducer are
//! executed on spawned tasks whose resulting actions are fed back in.
//!
//! This gives the single-writer discipline the data layer relies on: there
//! is no way to mutate state except by dispatching an action. In-flight
//! effects are never cancelled; if two operations race (say a delete racing
//! a list refetch), the last action to be reduced wins.
//!
//! ## Example
//!
//! ```ignore
//! use lectern_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action; effects run in the background.
//! let handle = store.send(Action::DoSomething).await;
//! handle.wait().await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use lectern_core::effect::Effect;
use lectern_core::reducer::Reducer;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, broadcast};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur while waiting on Store operations.
    ///
    /// `send` itself is infallible: effects are fire-and-forget and their
    /// failures surface as error actions, not as `Err` returns.
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Timeout waiting for a terminal action.
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed.
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Handle over the effect tasks spawned by a single `send`.
///
/// Waiting on the handle waits for the whole feedback cascade rooted at that
/// send: effects, the actions they produce, and the effects those actions
/// produce in turn.
pub struct EffectHandle {
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl EffectHandle {
    const fn new(handles: Vec<tokio::task::JoinHandle<()>>) -> Self {
        Self { handles }
    }

    /// Wait for all effects rooted at this send to complete.
    pub async fn wait(self) {
        for handle in self.handles {
            if let Err(err) = handle.await {
                tracing::error!(error = %err, "effect task panicked");
            }
        }
    }

    /// Let the effects run to completion in the background.
    pub fn detach(self) {}

    /// `true` when the send produced no effects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// The Store - runtime coordinator for a reducer.
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent access)
/// 2. Reducer (feature logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop)
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    /// Action broadcast channel for observing actions produced by effects.
    ///
    /// Only actions produced by effects are broadcast (not the action passed
    /// to `send`). This enables request-response waiting via
    /// `send_and_wait_for`.
    action_broadcast: broadcast::Sender<A>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + Clone + 'static,
{
    /// Create a new store with initial state, reducer, and environment.
    ///
    /// The action broadcast capacity defaults to 16; use
    /// [`Store::with_broadcast_capacity`] when observers frequently lag.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
    }

    /// Create a new store with a custom action broadcast capacity.
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity);

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            action_broadcast,
        }
    }

    /// Send an action through the reducer and spawn its effects.
    ///
    /// The reducer runs to completion under the write lock before this
    /// method returns; effects run on background tasks afterwards. Use the
    /// returned [`EffectHandle`] to wait for the full cascade, or drop it to
    /// let effects run detached.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> EffectHandle {
        let effects = {
            let mut state = self.state.write().await;
            self.reducer.reduce(&mut state, action, &self.environment)
        };

        let mut handles = Vec::new();
        for effect in effects {
            if effect.is_none() {
                continue;
            }
            handles.push(tokio::spawn(Self::drive(self.clone(), effect)));
        }
        EffectHandle::new(handles)
    }

    /// Send an action and wait for a matching result action.
    ///
    /// Designed for request-response flows: subscribe to the action
    /// broadcast BEFORE sending (avoids races), send the action, then return
    /// the first effect-produced action matching the predicate.
    ///
    /// By the time a matching action is returned it has already been reduced
    /// into state, so a follow-up `state()` read observes its transition.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: timeout expired before a matching action
    /// - [`StoreError::ChannelClosed`]: the store dropped its broadcast side
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        let mut actions = self.action_broadcast.subscribe();
        self.send(action).await.detach();

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match tokio::time::timeout_at(deadline, actions.recv()).await {
                Err(_) => return Err(StoreError::Timeout),
                Ok(Err(broadcast::error::RecvError::Closed)) => {
                    return Err(StoreError::ChannelClosed);
                },
                // Lagging just drops old actions; keep waiting, the timeout
                // is the backstop.
                Ok(Err(broadcast::error::RecvError::Lagged(skipped))) => {
                    tracing::warn!(skipped, "action observer lagged");
                },
                Ok(Ok(observed)) => {
                    if predicate(&observed) {
                        return Ok(observed);
                    }
                },
            }
        }
    }

    /// Read a value out of state.
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Subscribe to actions produced by effects.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Execute one effect, feeding any produced action back into the store.
    ///
    /// Boxed so the feedback recursion (effect → action → effects → ...)
    /// goes through dynamic dispatch instead of an infinitely nested future
    /// type.
    fn drive(store: Self, effect: Effect<A>) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(async move {
            match effect {
                Effect::None => {},
                Effect::Future(fut) => {
                    if let Some(action) = fut.await {
                        // Reduce first, then broadcast: observers of the
                        // action must be able to read the state it produced.
                        let handle = store.send(action.clone()).await;
                        let _ = store.action_broadcast.send(action);
                        handle.wait().await;
                    }
                },
                Effect::Parallel(effects) => {
                    let mut handles = Vec::new();
                    for inner in effects {
                        handles.push(tokio::spawn(Self::drive(store.clone(), inner)));
                    }
                    for handle in handles {
                        if let Err(err) = handle.await {
                            tracing::error!(error = %err, "parallel effect task panicked");
                        }
                    }
                },
                Effect::Sequential(effects) => {
                    for inner in effects {
                        Self::drive(store.clone(), inner).await;
                    }
                },
            }
        })
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            action_broadcast: self.action_broadcast.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lectern_core::{SmallVec, smallvec};

    #[derive(Debug, Clone, Default)]
    struct CounterState {
        count: i64,
        pings: u32,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum CounterAction {
        Increment,
        PingThenIncrement,
        Pong,
    }

    #[derive(Clone)]
    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = CounterState;
        type Action = CounterAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                CounterAction::Increment => {
                    state.count += 1;
                    smallvec![Effect::None]
                },
                CounterAction::PingThenIncrement => {
                    state.pings += 1;
                    smallvec![Effect::future(async { Some(CounterAction::Pong) })]
                },
                CounterAction::Pong => {
                    state.count += 1;
                    smallvec![Effect::None]
                },
            }
        }
    }

    #[tokio::test]
    async fn send_reduces_before_returning() {
        let store = Store::new(CounterState::default(), CounterReducer, ());
        store.send(CounterAction::Increment).await.wait().await;
        assert_eq!(store.state(|s| s.count).await, 1);
    }

    #[tokio::test]
    async fn effect_actions_feed_back_into_reducer() {
        let store = Store::new(CounterState::default(), CounterReducer, ());
        store
            .send(CounterAction::PingThenIncrement)
            .await
            .wait()
            .await;
        assert_eq!(store.state(|s| (s.pings, s.count)).await, (1, 1));
    }

    #[tokio::test]
    async fn send_and_wait_for_returns_terminal_action() {
        let store = Store::new(CounterState::default(), CounterReducer, ());
        let result = store
            .send_and_wait_for(
                CounterAction::PingThenIncrement,
                |a| matches!(a, CounterAction::Pong),
                Duration::from_secs(1),
            )
            .await
            .unwrap();
        assert_eq!(result, CounterAction::Pong);
        // The matching action was reduced before it was broadcast.
        assert_eq!(store.state(|s| s.count).await, 1);
    }

    #[tokio::test]
    async fn send_and_wait_for_times_out_without_match() {
        let store = Store::new(CounterState::default(), CounterReducer, ());
        let result = store
            .send_and_wait_for(
                CounterAction::Increment,
                |a| matches!(a, CounterAction::Pong),
                Duration::from_millis(50),
            )
            .await;
        assert!(matches!(result, Err(StoreError::Timeout)));
    }
}
