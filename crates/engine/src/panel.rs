//! The generic panel controller.
//!
//! One [`PanelController`] drives every feature-area panel; panels differ
//! only in the catalog they are constructed with. State transitions:
//!
//! - `select_operation` toggles the expanded operation; expanding a
//!   different one clears the last result
//! - `update_field` stores raw text without validation
//! - `execute` claims the panel's busy flag atomically, validates input,
//!   sends the request and records the outcome
//! - `teardown` cancels any in-flight request; its response is dropped
//!
//! State lives behind short-lived mutexes that are never held across an
//! `.await`, so a controller can be cloned into spawned tasks freely.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError, RwLock,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Instant,
};

use seodeck_api::{ApiClient, RequestOptions, TransportError};
use seodeck_types::{Catalog, ExecutionResult, OperationDescriptor, PanelId};
use serde_json::Value;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    PanelEvent,
    body::{FieldError, FieldValues, build_request_body},
    session::GlobalTarget,
};

/// The result of one `execute` call.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecuteOutcome {
    Completed(ExecutionResult),
    Failed(TransportError),
    /// Input validation failed; nothing was sent.
    Rejected(FieldError),
    /// Another execution on this panel was already in flight.
    Busy,
    /// The panel was torn down before a response arrived.
    Cancelled,
    UnknownOperation,
}

/// The most recent successful result, tagged with the operation that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct LastResult {
    pub operation_id: String,
    pub result: ExecutionResult,
}

/// A point-in-time copy of panel state for rendering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelSnapshot {
    pub selected: Option<String>,
    pub category_filter: Option<String>,
    pub is_executing: bool,
    pub last_result: Option<LastResult>,
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct PanelState {
    selected: Option<String>,
    category_filter: Option<String>,
    last_result: Option<LastResult>,
    last_error: Option<String>,
    field_values: HashMap<String, FieldValues>,
}

struct PanelInner {
    panel: PanelId,
    catalog: RwLock<Arc<Catalog>>,
    client: ApiClient,
    target: GlobalTarget,
    state: Mutex<PanelState>,
    busy: AtomicBool,
    cancel: CancellationToken,
    refresh_generation: Arc<AtomicU64>,
    events: broadcast::Sender<PanelEvent>,
}

/// Cheaply cloneable handle to one panel's state.
#[derive(Clone)]
pub struct PanelController {
    inner: Arc<PanelInner>,
}

impl std::fmt::Debug for PanelController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelController")
            .field("panel", &self.inner.panel)
            .field("busy", &self.inner.busy.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Releases the busy flag when dropped, whichever way `execute` exits.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl PanelController {
    pub fn new(
        catalog: Arc<Catalog>,
        client: ApiClient,
        target: GlobalTarget,
        cancel: CancellationToken,
        refresh_generation: Arc<AtomicU64>,
        events: broadcast::Sender<PanelEvent>,
    ) -> Self {
        Self {
            inner: Arc::new(PanelInner {
                panel: catalog.panel,
                catalog: RwLock::new(catalog),
                client,
                target,
                state: Mutex::new(PanelState::default()),
                busy: AtomicBool::new(false),
                cancel,
                refresh_generation,
                events,
            }),
        }
    }

    pub fn panel(&self) -> PanelId {
        self.inner.panel
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        self.inner.catalog.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Swap in a new catalog, keeping the selection when it still exists.
    pub fn replace_catalog(&self, catalog: Catalog) {
        let catalog = Arc::new(catalog);
        {
            let mut state = self.state();
            if let Some(selected) = state.selected.as_deref()
                && catalog.find(selected).is_none()
            {
                state.selected = None;
            }
        }
        *self.inner.catalog.write().unwrap_or_else(PoisonError::into_inner) = catalog;
    }

    pub fn is_executing(&self) -> bool {
        self.inner.busy.load(Ordering::Acquire)
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        let state = self.state();
        PanelSnapshot {
            selected: state.selected.clone(),
            category_filter: state.category_filter.clone(),
            is_executing: self.is_executing(),
            last_result: state.last_result.clone(),
            last_error: state.last_error.clone(),
        }
    }

    pub fn selected(&self) -> Option<String> {
        self.state().selected.clone()
    }

    /// Toggle the expanded operation and return the new selection.
    ///
    /// Selecting the expanded operation collapses it. Any change of selection
    /// clears the last result. Unknown ids leave the state untouched.
    pub fn select_operation(&self, operation_id: &str) -> Option<String> {
        let known = self.catalog().find(operation_id).is_some();
        let mut state = self.state();
        if !known {
            return state.selected.clone();
        }
        if state.selected.as_deref() == Some(operation_id) {
            state.selected = None;
        } else {
            state.selected = Some(operation_id.to_string());
        }
        state.last_result = None;
        state.last_error = None;
        state.selected.clone()
    }

    pub fn update_field(&self, operation_id: &str, field_name: &str, value: impl Into<String>) {
        self.state()
            .field_values
            .entry(operation_id.to_string())
            .or_default()
            .insert(field_name.to_string(), value.into());
    }

    /// The raw value last typed into a field, or an empty string.
    pub fn field_value(&self, operation_id: &str, field_name: &str) -> String {
        self.state()
            .field_values
            .get(operation_id)
            .and_then(|values| values.get(field_name))
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_category_filter(&self, category: Option<String>) {
        self.state().category_filter = category;
    }

    /// Operations passing the current category filter, in catalog order.
    pub fn visible_operations(&self) -> Vec<OperationDescriptor> {
        let filter = self.state().category_filter.clone();
        self.catalog().filter(filter.as_deref()).cloned().collect()
    }

    /// Cancel any in-flight request. Late responses are dropped without
    /// touching panel state, and later `execute` calls return
    /// [`ExecuteOutcome::Cancelled`].
    pub fn teardown(&self) {
        debug!(panel = %self.inner.panel, "panel torn down");
        self.inner.cancel.cancel();
    }

    /// Build, send and record one invocation of `operation_id`.
    pub async fn execute(&self, operation_id: &str) -> ExecuteOutcome {
        let inner = &*self.inner;
        if inner.cancel.is_cancelled() {
            return ExecuteOutcome::Cancelled;
        }
        let Some(operation) = self.catalog().find(operation_id).cloned() else {
            warn!(panel = %inner.panel, operation = operation_id, "execute requested for unknown operation");
            return ExecuteOutcome::UnknownOperation;
        };
        let Some(_busy) = BusyGuard::claim(&inner.busy) else {
            debug!(panel = %inner.panel, operation = operation_id, "panel busy; execute ignored");
            return ExecuteOutcome::Busy;
        };

        let global_url = inner.target.get();
        let built = {
            let state = self.state();
            build_request_body(&operation, global_url.as_deref(), state.field_values.get(operation_id))
        };
        let body = match built {
            Ok(body) => body,
            Err(error) => {
                info!(panel = %inner.panel, operation = operation_id, field = error.field(), "input rejected");
                self.state().last_error = Some(error.to_string());
                self.emit(PanelEvent::Invalid {
                    panel: inner.panel,
                    operation: operation_id.to_string(),
                    field: error.field().to_string(),
                    message: error.to_string(),
                });
                return ExecuteOutcome::Rejected(error);
            }
        };

        self.emit(PanelEvent::Started {
            panel: inner.panel,
            operation: operation_id.to_string(),
        });
        let options = RequestOptions {
            method: operation.method,
            headers: Vec::new(),
            body: operation.send_body.then_some(Value::Object(body)),
        };
        let start = Instant::now();
        let response = tokio::select! {
            biased;
            _ = inner.cancel.cancelled() => None,
            response = inner.client.fetch_json(&operation.endpoint, options) => Some(response),
        };

        match response {
            None => {
                info!(panel = %inner.panel, operation = operation_id, "in-flight request cancelled");
                ExecuteOutcome::Cancelled
            }
            Some(Ok(payload)) => {
                let result = ExecutionResult::from_payload(payload);
                {
                    let mut state = self.state();
                    state.last_result = Some(LastResult {
                        operation_id: operation_id.to_string(),
                        result: result.clone(),
                    });
                    state.last_error = None;
                }
                let generation = inner.refresh_generation.fetch_add(1, Ordering::AcqRel) + 1;
                info!(
                    panel = %inner.panel,
                    operation = operation_id,
                    status = result.status.as_deref().unwrap_or("-"),
                    duration_ms = start.elapsed().as_millis(),
                    "operation completed"
                );
                self.emit(PanelEvent::Succeeded {
                    panel: inner.panel,
                    operation: operation_id.to_string(),
                });
                self.emit(PanelEvent::RefreshRequested { generation });
                ExecuteOutcome::Completed(result)
            }
            Some(Err(error)) => {
                warn!(
                    panel = %inner.panel,
                    operation = operation_id,
                    duration_ms = start.elapsed().as_millis(),
                    error = %error,
                    "operation failed"
                );
                self.state().last_error = Some(error.to_string());
                self.emit(PanelEvent::Failed {
                    panel: inner.panel,
                    operation: operation_id.to_string(),
                    message: error.to_string(),
                });
                ExecuteOutcome::Failed(error)
            }
        }
    }

    fn state(&self) -> MutexGuard<'_, PanelState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: PanelEvent) {
        // Sending only fails when nobody is subscribed.
        let _ = self.inner.events.send(event);
    }
}
