use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::time::Duration;

use futures::channel::oneshot;
use object_types::{ContextProps, DataMessage, ObjectState};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::config::BridgeConfig;
use crate::context::{ObjectArgs, ObjectContext, StoreSlot};
use crate::error::BridgeError;
use crate::facade::Adapter;
use crate::handler::ObjectHandler;
use crate::id::CallId;
use crate::pending::{Outcome, PendingCall};
use crate::protocol::{
    self, HostMessage, ObjectMessage, ResponseResult, WireResult, ADAPTER, IFRAME_CONTEXT_CHANGE,
    IFRAME_DATA_MESSAGE,
};
use crate::transport::{Spawn, Transport};

/// What [`Bridge::handle_message`] did with an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Data message handed to the object's handler.
    DataMessage,
    /// Context refresh handed to the object's handler.
    ContextChange,
    /// A pending call was resolved.
    Resolved { id: String },
    /// A pending call was rejected.
    Rejected { id: String },
    /// A response arrived for an id that is not pending.
    Unmatched { id: String },
    /// Not for us, malformed, from an untrusted origin, or the bridge is
    /// not running.
    Ignored,
}

pub(crate) struct PendingEntry {
    function: String,
    completion: oneshot::Sender<Outcome>,
}

pub(crate) struct Shared {
    pub(crate) config: BridgeConfig,
    transport: Box<dyn Transport>,
    spawner: Box<dyn Spawn>,
    pending: Mutex<HashMap<String, PendingEntry>>,
    handler: RwLock<Option<Arc<dyn ObjectHandler>>>,
    stores: Mutex<HashMap<String, Arc<StoreSlot>>>,
    running: AtomicBool,
}

impl Shared {
    fn pending(&self) -> MutexGuard<'_, HashMap<String, PendingEntry>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn take_pending(&self, id: &str) -> Option<PendingEntry> {
        self.pending().remove(id)
    }

    /// Rejects `id` with a timeout if it is still pending.
    fn expire(&self, id: &str, limit: Duration) {
        let Some(entry) = self.take_pending(id) else {
            return;
        };
        warn!(function = %entry.function, id, ?limit, "call timed out");
        let _ = entry.completion.send(Err(BridgeError::Timeout {
            function: entry.function,
            id: id.to_string(),
        }));
    }

    fn handler(&self) -> Option<Arc<dyn ObjectHandler>> {
        self.handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Object-side end of the channel.
///
/// Owns the pending-call table and dispatches inbound messages. Cloning is
/// cheap and every clone shares the same state; separate `Bridge::new`
/// instances never interfere with each other.
#[derive(Clone)]
pub struct Bridge {
    shared: Arc<Shared>,
}

impl Bridge {
    pub fn new(
        config: BridgeConfig,
        transport: impl Transport + 'static,
        spawner: impl Spawn + 'static,
    ) -> Self {
        Bridge {
            shared: Arc::new(Shared {
                config,
                transport: Box::new(transport),
                spawner: Box::new(spawner),
                pending: Mutex::new(HashMap::new()),
                handler: RwLock::new(None),
                stores: Mutex::new(HashMap::new()),
                running: AtomicBool::new(false),
            }),
        }
    }

    /// A bridge whose data-message callbacks run on the current tokio
    /// runtime.
    #[cfg(feature = "tokio")]
    pub fn with_tokio(config: BridgeConfig, transport: impl Transport + 'static) -> Self {
        Bridge::new(config, transport, crate::transport::TokioSpawner)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.shared.config
    }

    /// The capability facade bound to this bridge.
    pub fn adapter(&self) -> Adapter {
        Adapter::new(self.clone())
    }

    /// Registers the object's callbacks, replacing any previous handler.
    pub fn set_handler(&self, handler: Arc<dyn ObjectHandler>) {
        *self
            .shared
            .handler
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }

    pub fn clear_handler(&self) {
        *self
            .shared
            .handler
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Starts dispatching and sends the `init` handshake.
    ///
    /// Calling `start` on a running bridge does nothing, so `init` goes out
    /// once per start.
    pub fn start(&self) -> Result<(), BridgeError> {
        if self.shared.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        if self.shared.config.target_origin.is_wildcard() {
            warn!("posting to target origin \"*\"; configure the host origin for production");
        }

        if let Err(e) = self.post(&ObjectMessage::Init) {
            self.shared.running.store(false, Ordering::SeqCst);
            return Err(e);
        }
        debug!(origin = %self.shared.config.target_origin, "bridge started");
        Ok(())
    }

    /// Stops dispatching and rejects every outstanding call with
    /// [`BridgeError::Stopped`]. Returns how many calls were rejected.
    pub fn stop(&self) -> usize {
        self.shared.running.store(false, Ordering::SeqCst);
        let drained: Vec<(String, PendingEntry)> = self.shared.pending().drain().collect();
        let count = drained.len();
        for (id, entry) in drained {
            trace!(%id, function = %entry.function, "rejecting call on stop");
            let _ = entry.completion.send(Err(BridgeError::Stopped));
        }
        debug!(rejected = count, "bridge stopped");
        count
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Number of calls awaiting a response.
    pub fn pending_calls(&self) -> usize {
        self.shared.pending().len()
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.shared.pending().contains_key(id)
    }

    /// Posts a request for `function` and returns its completion.
    ///
    /// The request is sent before this returns. A transport failure is
    /// reported by the returned future, and the call is not left pending.
    /// With a call timeout configured, the deadline runs on the spawner
    /// whether or not the returned future is polled.
    pub fn call(&self, function: &str, args: Vec<String>) -> PendingCall {
        let id = String::from(CallId::generate());
        let (tx, rx) = oneshot::channel();

        self.shared.pending().insert(
            id.clone(),
            PendingEntry {
                function: function.to_string(),
                completion: tx,
            },
        );

        let request = ObjectMessage::Adapter {
            function: function.to_string(),
            id: id.clone(),
            args,
        };
        if let Err(e) = self.post(&request) {
            self.shared.take_pending(&id);
            return PendingCall::failed(id, function.to_string(), e);
        }

        trace!(%id, function, "call posted");
        if let Some(limit) = self.shared.config.call_timeout() {
            self.arm_deadline(id.clone(), function, limit);
        }
        PendingCall::waiting(id, function.to_string(), rx)
    }

    fn arm_deadline(&self, id: String, function: &str, limit: Duration) {
        let Some(timer) = self.shared.spawner.timer(limit) else {
            warn!(%id, function, "no timer available; call timeout not enforced");
            return;
        };
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        self.shared.spawner.spawn(Box::pin(async move {
            timer.await;
            if let Some(shared) = shared.upgrade() {
                shared.expire(&id, limit);
            }
        }));
    }

    /// Sends the `window-size` layout hint.
    pub fn report_window_size(&self, scroll_width: u32, scroll_height: u32) -> Result<(), BridgeError> {
        self.post(&ObjectMessage::WindowSize {
            scroll_width,
            scroll_height,
        })
    }

    fn post(&self, message: &ObjectMessage) -> Result<(), BridgeError> {
        let value = serde_json::to_value(message).map_err(|e| BridgeError::Encode(e.to_string()))?;
        self.shared
            .transport
            .post(&value, self.shared.config.target_origin.as_str())
    }

    /// Dispatches one inbound message. Never panics on foreign input.
    pub fn handle_message(&self, origin: &str, data: &Value) -> Dispatch {
        if !self.is_running() {
            trace!("bridge not running; message ignored");
            return Dispatch::Ignored;
        }
        if !self.shared.config.target_origin.accepts(origin) {
            debug!(origin, "message from untrusted origin ignored");
            return Dispatch::Ignored;
        }

        match protocol::message_type(data) {
            Some(IFRAME_DATA_MESSAGE) => self.dispatch_data_message(data),
            Some(IFRAME_CONTEXT_CHANGE) => self.dispatch_context_change(data),
            Some(ADAPTER) => self.dispatch_response(data),
            _ => Dispatch::Ignored,
        }
    }

    fn dispatch_data_message(&self, data: &Value) -> Dispatch {
        let (message, state, context) = match HostMessage::deserialize(data) {
            Ok(HostMessage::IframeDataMessage {
                message,
                state,
                context,
            }) => (message, state, context),
            Ok(_) => return Dispatch::Ignored,
            Err(e) => {
                debug!(error = %e, "malformed data message ignored");
                return Dispatch::Ignored;
            }
        };

        let args = self.build_args(state, context);
        if let Some(handler) = self.shared.handler() {
            self.spawn_data_callback(handler, message, args);
        }
        Dispatch::DataMessage
    }

    fn spawn_data_callback(&self, handler: Arc<dyn ObjectHandler>, message: DataMessage, args: ObjectArgs) {
        self.shared.spawner.spawn(Box::pin(async move {
            handler.on_data_message(message, args).await;
        }));
    }

    fn dispatch_context_change(&self, data: &Value) -> Dispatch {
        let (state, context) = match HostMessage::deserialize(data) {
            Ok(HostMessage::IframeContextChange { state, context }) => (state, context),
            Ok(_) => return Dispatch::Ignored,
            Err(e) => {
                debug!(error = %e, "malformed context change ignored");
                return Dispatch::Ignored;
            }
        };

        let args = self.build_args(state, context);
        if let Some(handler) = self.shared.handler() {
            handler.on_args_change(args);
        }
        Dispatch::ContextChange
    }

    fn dispatch_response(&self, data: &Value) -> Dispatch {
        // Requests share the discriminant; only responses lack `function`.
        if data.get("function").is_some() {
            return Dispatch::Ignored;
        }
        let Some(id) = data.get("id").and_then(Value::as_str) else {
            return Dispatch::Ignored;
        };

        let Some(entry) = self.shared.take_pending(id) else {
            warn!(id, "response for unknown call dropped");
            return Dispatch::Unmatched { id: id.to_string() };
        };

        let outcome = match ResponseResult::from_wire(data.get("result")) {
            WireResult::Tagged(ResponseResult::Success(value)) => Ok(value),
            WireResult::Tagged(ResponseResult::Error(value)) => Err(BridgeError::Rejected {
                function: entry.function.clone(),
                value,
            }),
            WireResult::Legacy(value) if self.shared.config.legacy_results => Ok(value),
            WireResult::Legacy(_) => Err(BridgeError::Protocol(format!(
                "untagged result for {}",
                entry.function
            ))),
        };

        let resolved = outcome.is_ok();
        trace!(id, function = %entry.function, resolved, "call completed");
        // The caller may have stopped listening; that is fine.
        let _ = entry.completion.send(outcome);

        if resolved {
            Dispatch::Resolved { id: id.to_string() }
        } else {
            Dispatch::Rejected { id: id.to_string() }
        }
    }

    /// Merges a host snapshot with a fresh facade. The instance's cached
    /// store is refreshed from the snapshot.
    pub(crate) fn build_args(&self, state: ObjectState, context: ContextProps) -> ObjectArgs {
        let slot = self.store_slot(&state.instance_id);
        slot.set(context.store.clone());
        let context = ObjectContext::new(self.adapter(), state.instance_id.clone(), slot, context);
        ObjectArgs::new(state, context)
    }

    pub(crate) fn store_slot(&self, instance_id: &str) -> Arc<StoreSlot> {
        let mut stores = self
            .shared
            .stores
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        stores
            .entry(instance_id.to_string())
            .or_insert_with(|| Arc::new(StoreSlot::default()))
            .clone()
    }
}
