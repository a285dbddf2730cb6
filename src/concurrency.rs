//! Bounded fan-out of keyed tasks.
//!
//! A [`TaskGroup`] spawns each task on the runtime behind a shared semaphore
//! and hands results back in completion order. Joining can be bounded by a
//! deadline; once it passes, or when the group is dropped, every unfinished
//! task is aborted.

use std::future::Future;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::warn;

/// What a group produced before it was joined or timed out.
#[derive(Debug)]
pub struct GroupOutcome<K, T> {
    /// Finished tasks in completion order
    pub completed: Vec<(K, T)>,
    /// Tasks that were aborted or panicked
    pub unfinished: Vec<K>,
    pub timed_out: bool,
}

impl<K: PartialEq, T> GroupOutcome<K, T> {
    pub fn take(&mut self, key: &K) -> Option<T> {
        let index = self.completed.iter().position(|(k, _)| k == key)?;
        Some(self.completed.remove(index).1)
    }
}

pub struct TaskGroup<K, T> {
    tasks: JoinSet<(K, T)>,
    pending: Vec<K>,
    permits: Arc<Semaphore>,
}

impl<K, T> TaskGroup<K, T>
where
    K: Clone + PartialEq + Debug + Send + 'static,
    T: Send + 'static,
{
    /// Group running at most `max_concurrency` tasks at once (minimum 1).
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            tasks: JoinSet::new(),
            pending: Vec::new(),
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn spawn<F>(&mut self, key: K, task: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        let permits = self.permits.clone();
        self.pending.push(key.clone());
        self.tasks.spawn(async move {
            // Semaphore is never closed, so acquire cannot fail.
            let _permit = permits.acquire_owned().await;
            (key, task.await)
        });
    }

    /// Wait for every task, or until `deadline` passes.
    pub async fn join_until(mut self, deadline: Option<Instant>) -> GroupOutcome<K, T> {
        let mut completed = Vec::with_capacity(self.pending.len());
        let mut timed_out = false;

        loop {
            let next = match deadline {
                Some(deadline) => {
                    match tokio::time::timeout_at(deadline, self.tasks.join_next()).await {
                        Ok(next) => next,
                        Err(_) => {
                            timed_out = true;
                            self.tasks.abort_all();
                            break;
                        }
                    }
                }
                None => self.tasks.join_next().await,
            };

            match next {
                None => break,
                Some(Ok((key, value))) => {
                    self.pending.retain(|k| k != &key);
                    completed.push((key, value));
                }
                Some(Err(e)) => {
                    warn!(error = %e, "Task did not complete");
                }
            }
        }

        if timed_out {
            warn!(unfinished = ?self.pending, "Deadline elapsed, aborted unfinished tasks");
        }

        GroupOutcome {
            completed,
            unfinished: std::mem::take(&mut self.pending),
            timed_out,
        }
    }

    pub async fn join_all(self) -> GroupOutcome<K, T> {
        self.join_until(None).await
    }
}
