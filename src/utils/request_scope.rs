//! Cancellable remote calls tied to the lifetime of a view.
//!
//! Every call started through a [`RequestScope`] can be aborted as a group.
//! A view owns one scope; leaving the view drops the scope, so responses that
//! arrive afterwards are discarded instead of updating state nobody shows.

use crate::utils::error::{AppError, AppResult};
use futures::future::{AbortHandle, Abortable};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Debug, Default)]
struct PendingRequests {
    next_id: u64,
    handles: HashMap<u64, AbortHandle>,
}

#[derive(Debug, Default)]
pub struct RequestScope {
    pending: Arc<Mutex<PendingRequests>>,
}

impl RequestScope {
    pub fn new() -> Self {
        RequestScope::default()
    }

    /// Wrap `request` so it belongs to this scope.
    ///
    /// The request is registered immediately, so cancelling the scope before
    /// the returned future is first polled still aborts it. An aborted request
    /// resolves to `AppError::Cancelled`. The returned future does not borrow
    /// the scope and may be spawned.
    pub fn run<T, F>(&self, request: F) -> impl Future<Output = AppResult<T>>
    where
        F: Future<Output = AppResult<T>>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let id = match self.pending.lock() {
            Ok(mut pending) => {
                let id = pending.next_id;
                pending.next_id += 1;
                pending.handles.insert(id, handle);
                Some(id)
            }
            Err(_) => None,
        };
        let pending = Arc::clone(&self.pending);

        async move {
            let result = Abortable::new(request, registration).await;

            if let (Some(id), Ok(mut pending)) = (id, pending.lock()) {
                pending.handles.remove(&id);
            }

            match result {
                Ok(outcome) => outcome,
                Err(_aborted) => Err(AppError::Cancelled),
            }
        }
    }

    /// Abort every request currently running under this scope.
    pub fn cancel_all(&self) {
        let handles = match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut pending.handles),
            Err(poisoned) => std::mem::take(&mut poisoned.into_inner().handles),
        };
        if !handles.is_empty() {
            debug!(count = handles.len(), "cancelling pending requests");
        }
        for handle in handles.into_values() {
            handle.abort();
        }
    }

    pub fn pending(&self) -> usize {
        self.pending
            .lock()
            .map(|pending| pending.handles.len())
            .unwrap_or(0)
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
