//! Task decisions and the context handed to running background work.

use super::error::WorkerError;
use super::Slot;
use crate::action::Action;
use crate::core::State;
use crate::store::{ApplyOutcome, Store};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Boxed future produced by a unit of background work.
pub type WorkFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A cancellable unit of background work, started with its [`TaskContext`].
pub type Work<S> = Box<dyn FnOnce(TaskContext<S>) -> WorkFuture + Send + 'static>;

/// What the supervisor should do for a newly published state.
pub enum AsyncWorkerTask<S: State> {
    /// Cancel the running task, if any, and forget its launch key
    Cancel,

    /// Always cancel the running task and start `work`
    ExecuteAndCancelExist { key: S, work: Work<S> },

    /// Start `work` unless a task with an equal launch key is still running
    ExecuteIfNotExist { key: S, work: Work<S> },
}

impl<S: State> AsyncWorkerTask<S> {
    pub fn execute_and_cancel_exist<F, Fut>(key: S, work: F) -> Self
    where
        F: FnOnce(TaskContext<S>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::ExecuteAndCancelExist {
            key,
            work: box_work(work),
        }
    }

    pub fn execute_if_not_exist<F, Fut>(key: S, work: F) -> Self
    where
        F: FnOnce(TaskContext<S>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::ExecuteIfNotExist {
            key,
            work: box_work(work),
        }
    }
}

impl<S: State> fmt::Debug for AsyncWorkerTask<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancel => f.write_str("Cancel"),
            Self::ExecuteAndCancelExist { key, .. } => f
                .debug_struct("ExecuteAndCancelExist")
                .field("key", key)
                .finish_non_exhaustive(),
            Self::ExecuteIfNotExist { key, .. } => f
                .debug_struct("ExecuteIfNotExist")
                .field("key", key)
                .finish_non_exhaustive(),
        }
    }
}

fn box_work<S, F, Fut>(work: F) -> Work<S>
where
    S: State,
    F: FnOnce(TaskContext<S>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Box::new(move |ctx| Box::pin(work(ctx)) as WorkFuture)
}

/// Identity of one launch: the launch key and a per-supervisor epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskTicket<S: State> {
    pub key: S,
    pub epoch: u64,
}

/// Handle given to running work.
///
/// Results must be fed back through [`TaskContext::proceed`], which drops
/// them once the task has been cancelled or superseded.
pub struct TaskContext<S: State> {
    ticket: TaskTicket<S>,
    token: CancellationToken,
    store: Arc<Store<S>>,
    slot: Arc<Mutex<Slot<S>>>,
}

impl<S: State> TaskContext<S> {
    pub(crate) fn new(
        ticket: TaskTicket<S>,
        token: CancellationToken,
        store: Arc<Store<S>>,
        slot: Arc<Mutex<Slot<S>>>,
    ) -> Self {
        Self {
            ticket,
            token,
            store,
            slot,
        }
    }

    pub fn ticket(&self) -> &TaskTicket<S> {
        &self.ticket
    }

    /// The state value this task was launched for.
    pub fn key(&self) -> &S {
        &self.ticket.key
    }

    pub fn epoch(&self) -> u64 {
        self.ticket.epoch
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once cancellation has been requested.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Whether this task is still the supervisor's active one.
    pub fn is_current(&self) -> bool {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        !self.token.is_cancelled() && slot.is_active(self.ticket.epoch)
    }

    /// Feed a follow-up action back into the store.
    ///
    /// Fails with [`WorkerError::StaleTask`] when the task was cancelled or
    /// replaced, and with [`StoreError::Unbound`](crate::store::StoreError::Unbound)
    /// after the worker was unbound. In both cases the action is not applied.
    pub fn proceed(&self, action: &Action<S>) -> Result<ApplyOutcome<S>, WorkerError> {
        // Held across `apply` so the task cannot be superseded mid-call.
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.unbound {
            return Err(crate::store::StoreError::Unbound.into());
        }
        if self.token.is_cancelled() || !slot.is_active(self.ticket.epoch) {
            debug!(
                epoch = self.ticket.epoch,
                key = self.ticket.key.name(),
                action = action.name(),
                "discarding result of stale async task"
            );
            return Err(WorkerError::StaleTask {
                epoch: self.ticket.epoch,
            });
        }

        Ok(self.store.apply(action)?)
    }

    /// Current state of the bound store.
    pub fn state(&self) -> Result<S, WorkerError> {
        Ok(self.store.state()?)
    }
}

impl<S: State> Clone for TaskContext<S> {
    fn clone(&self) -> Self {
        Self {
            ticket: self.ticket.clone(),
            token: self.token.clone(),
            store: Arc::clone(&self.store),
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<S: State> fmt::Debug for TaskContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskContext")
            .field("ticket", &self.ticket)
            .field("cancelled", &self.token.is_cancelled())
            .finish_non_exhaustive()
    }
}
