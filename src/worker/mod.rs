//! State-keyed supervision of background work.
//!
//! An [`AsyncWorker`] decides, for every state the store publishes, whether
//! background work should be cancelled, replaced, or started only if an
//! equivalent task is not already running. [`AsyncWorkerBinding`] subscribes
//! to the store and carries out those decisions, keeping at most one task
//! alive at a time.
//!
//! # Cancellation
//!
//! Cancellation is cooperative. A replaced task's token is cancelled and its
//! future is dropped at its next suspension point, but the replacement is
//! started right away without waiting for that to happen. Every launch gets
//! a fresh epoch; [`TaskContext::proceed`] refuses to apply results from a
//! task that is no longer the active one.
//!
//! # Failures
//!
//! A panic in [`AsyncWorker::on_next_state`] is reported to
//! [`AsyncWorker::on_subscription_error`] and ends the subscription: no
//! further decisions are computed and the machine can be stuck in its
//! current state. The default hook escalates by panicking the subscription
//! task. Whatever the hook does, the fault is kept on the binding and handed
//! to callers by [`AsyncWorkerBinding::fault`] and
//! [`AsyncWorkerBinding::closed`]. Panics inside work are reported to
//! [`AsyncWorker::on_task_error`].

mod error;
mod task;

pub use error::WorkerError;
pub use task::{AsyncWorkerTask, TaskContext, TaskTicket, Work, WorkFuture};

use crate::core::State;
use crate::store::{StateStream, Store};
use error::panic_message;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info_span, trace, Instrument};

/// Decides the background work that belongs to each published state.
pub trait AsyncWorker<S: State>: Send + Sync + 'static {
    /// Map a newly published state to a task decision.
    ///
    /// Called for every published state, in publication order, never
    /// concurrently with itself. Work started from here should handle its
    /// own errors and feed results back with [`TaskContext::proceed`];
    /// otherwise the machine can get stuck in the launching state.
    ///
    /// Runs outside the supervisor's lock, so it may query the binding.
    fn on_next_state(&self, state: &S) -> AsyncWorkerTask<S>;

    /// Called once when deciding a task failed. The subscription ends
    /// after this returns.
    ///
    /// The default implementation logs and panics.
    fn on_subscription_error(&self, error: WorkerError) {
        error!(%error, "async worker subscription failed; the state machine may be stuck");
        panic!("{error}");
    }

    /// Called when a background task panicked.
    fn on_task_error(&self, error: WorkerError) {
        error!(%error, "async task failed; the state machine may be stuck");
    }
}

/// Async worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Name recorded on the subscription's tracing span
    pub name: String,
    /// Runtime running background work. Defaults to the runtime the worker
    /// is bound from.
    pub task_runtime: Option<Handle>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            name: "async-worker".to_string(),
            task_runtime: None,
        }
    }
}

/// Counters describing what the supervisor has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// States passed to `on_next_state`
    pub decisions: u64,
    /// Tasks started
    pub launched: u64,
    /// `ExecuteIfNotExist` decisions skipped because the task was running
    pub deduplicated: u64,
    /// Running or finished tasks whose token was cancelled
    pub cancelled: u64,
}

struct ActiveTask<S: State> {
    ticket: TaskTicket<S>,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

pub(crate) struct Slot<S: State> {
    active: Option<ActiveTask<S>>,
    stats: WorkerStats,
    fault: Option<WorkerError>,
    pub(crate) unbound: bool,
}

impl<S: State> Slot<S> {
    pub(crate) fn is_active(&self, epoch: u64) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.ticket.epoch == epoch)
    }

    fn is_running(&self, key: &S) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.handle.is_finished() && active.ticket.key == *key)
    }

    fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            active.token.cancel();
            self.stats.cancelled += 1;
            trace!(
                epoch = active.ticket.epoch,
                key = active.ticket.key.name(),
                "async task cancelled"
            );
        }
    }
}

struct Supervisor<S: State> {
    worker: Arc<dyn AsyncWorker<S>>,
    store: Arc<Store<S>>,
    slot: Arc<Mutex<Slot<S>>>,
    tasks: Handle,
    ended: CancellationToken,
}

impl<S: State> Supervisor<S> {
    async fn run(self: Arc<Self>, mut states: StateStream<S>) {
        // Fires however the loop ends, including abort and a panicking hook.
        let _ended = self.ended.clone().drop_guard();

        while let Some(state) = states.next().await {
            if self.lock().unbound {
                break;
            }
            let decision = catch_unwind(AssertUnwindSafe(|| self.worker.on_next_state(&state)));

            let fault = {
                let mut slot = self.lock();
                if slot.unbound {
                    break;
                }
                slot.stats.decisions += 1;
                match decision {
                    Ok(task) => {
                        trace!(state = state.name(), ?task, "async worker decision");
                        self.handle(&mut slot, task);
                        None
                    }
                    Err(payload) => {
                        let fault = WorkerError::SubscriptionFault {
                            state: state.kind(),
                            message: panic_message(payload.as_ref()),
                        };
                        slot.fault = Some(fault.clone());
                        Some(fault)
                    }
                }
            };

            if let Some(fault) = fault {
                self.worker.on_subscription_error(fault);
                break;
            }
        }
        debug!("async worker subscription ended");
    }

    fn handle(&self, slot: &mut Slot<S>, task: AsyncWorkerTask<S>) {
        match task {
            AsyncWorkerTask::Cancel => slot.cancel(),
            AsyncWorkerTask::ExecuteAndCancelExist { key, work } => self.launch(slot, key, work),
            AsyncWorkerTask::ExecuteIfNotExist { key, work } => {
                if slot.is_running(&key) {
                    slot.stats.deduplicated += 1;
                    trace!(key = key.name(), "async task already running");
                } else {
                    self.launch(slot, key, work);
                }
            }
        }
    }

    fn launch(&self, slot: &mut Slot<S>, key: S, work: Work<S>) {
        slot.cancel();
        slot.stats.launched += 1;

        let epoch = slot.stats.launched;
        let state = key.kind();
        let ticket = TaskTicket { key, epoch };
        let token = CancellationToken::new();
        let ctx = TaskContext::new(
            ticket.clone(),
            token.clone(),
            Arc::clone(&self.store),
            Arc::clone(&self.slot),
        );

        let task_token = token.clone();
        let run = self.tasks.spawn(async move {
            let future = work(ctx);
            tokio::select! {
                biased;
                _ = task_token.cancelled() => {}
                _ = future => trace!(epoch, "async task completed"),
            }
        });

        let worker = Arc::clone(&self.worker);
        let handle = self.tasks.spawn(async move {
            if let Err(join) = run.await {
                if join.is_panic() {
                    let message = panic_message(join.into_panic().as_ref());
                    worker.on_task_error(WorkerError::TaskPanicked {
                        state,
                        epoch,
                        message,
                    });
                }
            }
        });

        debug!(epoch, key = state.name(), "async task launched");
        slot.active = Some(ActiveTask {
            ticket,
            token,
            handle,
        });
    }

    fn lock(&self) -> MutexGuard<'_, Slot<S>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An [`AsyncWorker`] bound to a store's state stream.
///
/// Dropping the binding cancels the subscription and any running task.
pub struct AsyncWorkerBinding<S: State> {
    supervisor: Arc<Supervisor<S>>,
    subscription: Mutex<Option<JoinHandle<()>>>,
}

impl<S: State> AsyncWorkerBinding<S> {
    /// Subscribe `worker` to `store`. Must be called from within a Tokio
    /// runtime.
    pub fn bind(
        store: Arc<Store<S>>,
        worker: Arc<dyn AsyncWorker<S>>,
        config: WorkerConfig,
    ) -> Result<Self, WorkerError> {
        let runtime = Handle::try_current().map_err(|_| WorkerError::NoRuntime)?;
        let tasks = config.task_runtime.unwrap_or_else(|| runtime.clone());
        let states = store.subscribe()?;

        let supervisor = Arc::new(Supervisor {
            worker,
            store,
            slot: Arc::new(Mutex::new(Slot {
                active: None,
                stats: WorkerStats::default(),
                fault: None,
                unbound: false,
            })),
            tasks,
            ended: CancellationToken::new(),
        });

        let span = info_span!("async_worker", name = %config.name);
        let subscription = runtime.spawn(Arc::clone(&supervisor).run(states).instrument(span));
        debug!(name = %config.name, "async worker bound");

        Ok(Self {
            supervisor,
            subscription: Mutex::new(Some(subscription)),
        })
    }

    /// Stop observing states, cancel the running task and close the store.
    ///
    /// After this returns `on_next_state` is never called again and every
    /// action submitted to the store fails with `StoreError::Unbound`.
    pub fn unbind(&self) {
        self.release();
        self.supervisor.store.close();
    }

    pub fn is_bound(&self) -> bool {
        !self.supervisor.lock().unbound
    }

    /// Whether the subscription is still computing decisions. Turns false
    /// after a subscription fault or unbinding.
    pub fn is_subscribed(&self) -> bool {
        !self.supervisor.ended.is_cancelled()
    }

    /// The fault that ended the subscription, if any.
    pub fn fault(&self) -> Option<WorkerError> {
        self.supervisor.lock().fault.clone()
    }

    /// Wait until the subscription has ended.
    ///
    /// Resolves with the subscription fault when one ended it, and with
    /// `Ok(())` after unbinding or once the store was closed.
    pub async fn closed(&self) -> Result<(), WorkerError> {
        self.supervisor.ended.cancelled().await;
        self.fault().map_or(Ok(()), Err)
    }

    /// Ticket of the task that is currently running, if any.
    pub fn active_task(&self) -> Option<TaskTicket<S>> {
        let slot = self.supervisor.lock();
        slot.active
            .as_ref()
            .filter(|active| !active.handle.is_finished())
            .map(|active| active.ticket.clone())
    }

    pub fn stats(&self) -> WorkerStats {
        self.supervisor.lock().stats
    }

    fn release(&self) {
        {
            let mut slot = self.supervisor.lock();
            if slot.unbound {
                return;
            }
            slot.unbound = true;
            slot.cancel();
        }

        if let Some(subscription) = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            subscription.abort();
        }
        self.supervisor.ended.cancel();
        debug!("async worker unbound");
    }
}

impl<S: State> Drop for AsyncWorkerBinding<S> {
    fn drop(&mut self) {
        self.release();
    }
}
