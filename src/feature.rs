//! Feature: a store plus an optional async worker behind one handle.
//!
//! # Example
//!
//! ```rust
//! use stategraph::action::{Action, Transition};
//! use stategraph::feature::Feature;
//! use stategraph::state_enum;
//!
//! state_enum! {
//!     enum Door => door {
//!         Closed,
//!         Open,
//!     }
//! }
//!
//! let open = Action::new(
//!     "Open",
//!     vec![Transition::new(door::Closed, door::Open, |_| Door::Open)],
//! )
//! .unwrap();
//!
//! let feature = Feature::new(Door::Closed);
//! feature.proceed(&open).unwrap();
//! assert_eq!(feature.current_state_once().unwrap(), Door::Open);
//! ```

use crate::action::Action;
use crate::core::{State, StateHistory};
use crate::store::{ApplyOutcome, StateStream, Store, StoreConfig, StoreError, UnmatchedPolicy};
use crate::worker::{AsyncWorker, AsyncWorkerBinding, WorkerConfig, WorkerError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeatureError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Worker(#[from] WorkerError),
}

/// Public face of one state machine.
pub struct Feature<S: State> {
    store: Arc<Store<S>>,
    worker: Option<AsyncWorkerBinding<S>>,
}

impl<S: State> Feature<S> {
    /// A feature without background work, using the default store config.
    pub fn new(initial: S) -> Self {
        Self {
            store: Arc::new(Store::new(initial)),
            worker: None,
        }
    }

    pub fn builder(initial: S) -> FeatureBuilder<S> {
        FeatureBuilder::new(initial)
    }

    /// Apply an action to the current state.
    pub fn proceed(&self, action: &Action<S>) -> Result<ApplyOutcome<S>, FeatureError> {
        Ok(self.store.apply(action)?)
    }

    /// The current state followed by every state published after it.
    pub fn observe_state(&self) -> Result<StateStream<S>, FeatureError> {
        Ok(self.store.subscribe()?)
    }

    pub fn current_state_once(&self) -> Result<S, FeatureError> {
        Ok(self.store.state()?)
    }

    pub fn history(&self) -> StateHistory<S> {
        self.store.history()
    }

    /// Stop the async worker, if any, and close the store.
    pub fn unbind(&self) {
        match &self.worker {
            Some(worker) => worker.unbind(),
            None => {
                self.store.close();
            }
        }
    }

    pub fn store(&self) -> &Arc<Store<S>> {
        &self.store
    }

    pub fn worker(&self) -> Option<&AsyncWorkerBinding<S>> {
        self.worker.as_ref()
    }

    /// The fault that stopped the async worker, if it has failed.
    pub fn fault(&self) -> Option<WorkerError> {
        self.worker.as_ref().and_then(AsyncWorkerBinding::fault)
    }
}

/// Builder for a [`Feature`].
pub struct FeatureBuilder<S: State> {
    initial: S,
    store: StoreConfig,
    worker: Option<Arc<dyn AsyncWorker<S>>>,
    worker_config: WorkerConfig,
}

impl<S: State> FeatureBuilder<S> {
    pub fn new(initial: S) -> Self {
        Self {
            initial,
            store: StoreConfig::default(),
            worker: None,
            worker_config: WorkerConfig::default(),
        }
    }

    pub fn unmatched(mut self, policy: UnmatchedPolicy) -> Self {
        self.store.unmatched = policy;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.store.history_limit = limit;
        self
    }

    pub fn worker(mut self, worker: impl AsyncWorker<S>) -> Self {
        self.worker = Some(Arc::new(worker));
        self
    }

    pub fn worker_config(mut self, config: WorkerConfig) -> Self {
        self.worker_config = config;
        self
    }

    /// Create the store and bind the worker. With a worker this must run
    /// inside a Tokio runtime.
    pub fn build(self) -> Result<Feature<S>, FeatureError> {
        let store = Arc::new(Store::with_config(self.initial, self.store));
        let worker = self
            .worker
            .map(|worker| AsyncWorkerBinding::bind(Arc::clone(&store), worker, self.worker_config))
            .transpose()?;

        Ok(Feature { store, worker })
    }
}
