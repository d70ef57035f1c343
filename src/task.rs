//! Eagerly driven, multiply-awaitable results
//!
//! Provider resolution and play requests settle whether or not anyone awaits
//! them, and several callers may wait on the same one. A [`SharedTask`] is a
//! `futures` `Shared` handle whose underlying future is also spawned on the
//! tokio runtime so it makes progress on its own.

use std::future::Future;

use futures::FutureExt;
use futures::future::{self, BoxFuture, Shared};

/// Settlement handle for an asynchronous operation.
pub type SharedTask<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

/// Spawns `fut` on the current tokio runtime and returns a shared handle to it.
///
/// Must be called from within a tokio runtime.
pub fn spawn_shared<T, E, F>(fut: F) -> SharedTask<T, E>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    let shared = fut.boxed().shared();
    tokio::spawn(shared.clone());
    shared
}

/// An already settled handle.
pub fn settled<T, E>(result: Result<T, E>) -> SharedTask<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    future::ready(result).boxed().shared()
}
