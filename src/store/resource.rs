//! Fetch-and-cache cell
//!
//! Holds one piece of remote state together with its loading and error flags.
//! A failed load keeps the previous data (stale-while-error). Overlapping loads
//! are sequenced: the most recently started load that completes wins, and
//! older responses arriving afterwards are dropped.

use crate::api::error::ApiError;
use crate::error_classifier::ErrorClassifier;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct ResourceState<T> {
    data: T,
    error: Option<String>,
    /// Token handed to the most recently started load.
    issued: u64,
    /// Token of the newest load whose outcome has been applied.
    applied: u64,
    /// Loads started but not yet finished.
    in_flight: usize,
}

/// Shared handle to a cached remote value. Clones observe the same state.
#[derive(Debug)]
pub struct Resource<T> {
    name: &'static str,
    inner: Arc<Mutex<ResourceState<T>>>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Outcome of a load, as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the cached data.
    Updated,
    /// The load failed; the error was recorded and the data kept.
    Failed,
    /// A newer load already settled; this response was dropped.
    Superseded,
}

impl<T> Resource<T> {
    /// `name` appears in error messages and logs, e.g. "tools".
    pub fn new(name: &'static str, initial: T) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(ResourceState {
                data: initial,
                error: None,
                issued: 0,
                applied: 0,
                in_flight: 0,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, ResourceState<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_loading(&self) -> bool {
        self.state().in_flight > 0
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    /// Runs `f` against the cached data without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.state().data)
    }

    /// Mutates the cached data in place. Used for optimistic local edits.
    pub fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.state().data)
    }

    /// Loads a fresh value through `fetch` and applies it.
    ///
    /// The lock is released while `fetch` is pending.
    pub async fn load<F>(&self, fetch: F) -> LoadOutcome
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let token = self.begin();
        let result = fetch.await;
        self.finish(token, result)
    }

    fn begin(&self) -> u64 {
        let mut state = self.state();
        state.issued += 1;
        state.in_flight += 1;
        state.error = None;
        state.issued
    }

    fn finish(&self, token: u64, result: Result<T, ApiError>) -> LoadOutcome {
        let mut state = self.state();
        state.in_flight = state.in_flight.saturating_sub(1);

        if token < state.applied {
            log::debug!(
                "Dropping stale {} response (request {}, already applied {})",
                self.name,
                token,
                state.applied
            );
            return LoadOutcome::Superseded;
        }
        state.applied = token;

        match result {
            Ok(data) => {
                state.data = data;
                state.error = None;
                log::debug!("Loaded {} (request {})", self.name, token);
                LoadOutcome::Updated
            }
            Err(err) => {
                let level = ErrorClassifier::new().classify_fetch_error(&err);
                log::log!(log::Level::from(level), "Error fetching {}: {}", self.name, err);
                state.error = Some(format!("Failed to fetch {}: {}", self.name, err));
                LoadOutcome::Failed
            }
        }
    }
}
