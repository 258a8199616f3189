//! Bounded fan-out over tokio tasks

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Runs `task` for every item with at most `limit` futures in flight
///
/// Results come back in input order. A slot is None when its task panicked or
/// was cancelled.
pub(crate) async fn run_bounded<T, F, Fut>(items: Vec<T>, limit: usize, task: F) -> Vec<Option<Fut::Output>>
where
    T: Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future + Send + 'static,
    Fut::Output: Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let mut join_set = JoinSet::new();
    let mut results: Vec<Option<Fut::Output>> = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        results.push(None);
        let semaphore = Arc::clone(&semaphore);
        let work = task(item);
        join_set.spawn(async move {
            // The semaphore is never closed, so acquiring only fails if it was dropped
            let _permit = semaphore.acquire_owned().await.ok();
            (index, work.await)
        });
    }

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, output)) => results[index] = Some(output),
            Err(e) => tracing::error!("Worker task failed: {}", e),
        }
    }

    results
}
