//! Posts environment.

use crate::providers::PostsGateway;
use lectern_core::environment::Clock;

/// Posts environment.
///
/// The clock is injected so cache-TTL behavior is testable without
/// sleeping; production wires [`lectern_core::environment::SystemClock`].
///
/// # Type Parameters
///
/// - `G`: posts gateway
/// - `C`: clock used to stamp `last_fetch`
#[derive(Clone)]
pub struct PostsEnvironment<G, C>
where
    G: PostsGateway + Clone,
    C: Clock + Clone,
{
    /// Remote posts endpoints.
    pub gateway: G,

    /// Time source for cache staleness.
    pub clock: C,
}

impl<G, C> PostsEnvironment<G, C>
where
    G: PostsGateway + Clone,
    C: Clock + Clone,
{
    /// Create a new posts environment.
    #[must_use]
    pub const fn new(gateway: G, clock: C) -> Self {
        Self { gateway, clock }
    }
}
