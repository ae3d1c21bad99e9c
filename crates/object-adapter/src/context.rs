use std::sync::{Arc, Mutex, PoisonError};

use object_types::{ContextProps, ObjectState, Token, User};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::BridgeError;
use crate::facade::{encode_arg, Adapter};
use crate::pending::Acknowledgement;
use crate::protocol::functions;

/// Last known store of one object instance, plus the lock that serializes
/// its read-modify-write updates.
#[derive(Default)]
pub(crate) struct StoreSlot {
    value: Mutex<Option<Value>>,
    update_lock: futures::lock::Mutex<()>,
}

impl StoreSlot {
    pub(crate) fn get(&self) -> Option<Value> {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set(&self, value: Option<Value>) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

/// Capability facade plus the per-instance operations (`send`, store
/// updates, view changes) and the host context at the time of dispatch.
#[derive(Clone)]
pub struct ObjectContext {
    adapter: Adapter,
    instance_id: String,
    slot: Arc<StoreSlot>,
    props: ContextProps,
}

impl ObjectContext {
    pub(crate) fn new(
        adapter: Adapter,
        instance_id: String,
        slot: Arc<StoreSlot>,
        props: ContextProps,
    ) -> Self {
        ObjectContext {
            adapter,
            instance_id,
            slot,
            props,
        }
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Store as delivered with this context.
    pub fn store(&self) -> Option<&Value> {
        self.props.store.as_ref()
    }

    pub fn view(&self) -> Option<&str> {
        self.props.view.as_deref()
    }

    /// Latest store known to the bridge, including updates acknowledged
    /// after this context was built.
    pub fn current_store(&self) -> Option<Value> {
        self.slot.get()
    }

    /// Sends a data message to the chat and waits for the host's
    /// acknowledgement.
    pub async fn send(&self, data: &Value) -> Result<(), BridgeError> {
        let encoded = encode_arg(functions::SEND, data)?;
        self.adapter
            .bridge()
            .call(functions::SEND, vec![encoded])
            .await
            .map(|_| ())
    }

    /// Applies `updater` to the current store and writes the result back.
    ///
    /// Updates on the same instance run one at a time: each updater sees the
    /// value written by the previous one. Returns the new store once the
    /// host acknowledged it.
    ///
    /// While the request is in flight the cached store is cleared, since the
    /// host may apply it at any point. A rejection restores the previous
    /// value. After a timeout, a stop, or a dropped future the cache stays
    /// empty until the next context refresh from the host.
    pub async fn update_store<F>(&self, updater: F) -> Result<Value, BridgeError>
    where
        F: FnOnce(Option<&Value>) -> Value + Send,
    {
        let _guard = self.slot.update_lock.lock().await;

        let current = self.slot.get();
        let next = updater(current.as_ref());
        let encoded = encode_arg(functions::UPDATE_STORE, &next)?;

        let pending = self
            .adapter
            .bridge()
            .call(functions::UPDATE_STORE, vec![encoded]);
        self.slot.set(None);

        match pending.await {
            Ok(_) => {
                debug!(instance = %self.instance_id, "store updated");
                self.slot.set(Some(next.clone()));
                Ok(next)
            }
            // Not applied: the host refused it or it was never posted.
            Err(e @ (BridgeError::Rejected { .. } | BridgeError::Transport(_))) => {
                self.slot.set(current);
                Err(e)
            }
            Err(e) => {
                warn!(instance = %self.instance_id, error = %e, "store update outcome unknown; cached store cleared");
                Err(e)
            }
        }
    }

    /// Tells the host the object switched views. Fire-and-forget.
    pub fn on_view_change(&self, view: &str) -> Acknowledgement {
        Acknowledgement::new(
            self.adapter
                .bridge()
                .call(functions::ON_VIEW_CHANGE, vec![view.to_string()]),
        )
    }
}

/// Everything an object handler receives: the chat snapshot merged with
/// the context and capabilities. Built fresh for every inbound message.
#[derive(Clone)]
pub struct ObjectArgs {
    pub state: ObjectState,
    pub context: ObjectContext,
}

impl ObjectArgs {
    pub(crate) fn new(state: ObjectState, context: ObjectContext) -> Self {
        ObjectArgs { state, context }
    }

    pub fn chat_id(&self) -> &str {
        &self.state.chat_id
    }

    pub fn object_id(&self) -> &str {
        &self.state.object_id
    }

    pub fn instance_id(&self) -> &str {
        &self.state.instance_id
    }

    pub fn profile(&self) -> &User {
        &self.state.profile
    }

    pub fn users(&self) -> &[User] {
        &self.state.users
    }

    pub fn tokens(&self) -> &[Token] {
        &self.state.tokens
    }

    pub fn store(&self) -> Option<&Value> {
        self.context.store()
    }

    pub fn view(&self) -> Option<&str> {
        self.context.view()
    }

    pub fn adapter(&self) -> &Adapter {
        self.context.adapter()
    }
}
