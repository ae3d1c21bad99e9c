//! Browser glue for the object side: `window.parent.postMessage` transport
//! and the window `message` listener.

use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::MessageEvent;

use crate::bridge::Bridge;
use crate::error::BridgeError;
use crate::transport::{Spawn, Transport};

fn js_error(value: JsValue) -> BridgeError {
    BridgeError::Transport(format!("{value:?}"))
}

fn window() -> Result<web_sys::Window, BridgeError> {
    web_sys::window().ok_or_else(|| BridgeError::Transport("no global window".into()))
}

/// Posts to the parent window.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowTransport;

impl Transport for WindowTransport {
    fn post(&self, message: &Value, target_origin: &str) -> Result<(), BridgeError> {
        let parent = window()?
            .parent()
            .map_err(js_error)?
            .ok_or_else(|| BridgeError::Transport("window has no parent".into()))?;
        let payload = message
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| BridgeError::Encode(e.to_string()))?;
        parent.post_message(&payload, target_origin).map_err(js_error)
    }
}

/// Runs detached tasks on the browser's microtask queue.
///
/// Offers no timer, so a configured call timeout is not enforced.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSpawner;

impl Spawn for LocalSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

/// Keeps a bridge subscribed to the window's `message` events.
///
/// Dropping the listener unsubscribes and stops the bridge.
pub struct WindowListener {
    bridge: Bridge,
    closure: Closure<dyn FnMut(MessageEvent)>,
}

impl WindowListener {
    /// Subscribes `bridge` and starts it, which sends the `init` handshake.
    pub fn attach(bridge: Bridge) -> Result<Self, BridgeError> {
        let window = window()?;
        let dispatcher = bridge.clone();
        let closure = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            match serde_wasm_bindgen::from_value::<Value>(event.data()) {
                Ok(data) => {
                    let outcome = dispatcher.handle_message(&event.origin(), &data);
                    debug!(?outcome, "message dispatched");
                }
                Err(e) => debug!(error = %e, "non-JSON message ignored"),
            }
        });
        window
            .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            .map_err(js_error)?;

        let listener = WindowListener { bridge, closure };
        listener.bridge.start()?;
        Ok(listener)
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            let _ = window
                .remove_event_listener_with_callback("message", self.closure.as_ref().unchecked_ref());
        }
        self.bridge.stop();
    }
}

/// Reports the document body's scroll size to the host.
pub fn report_body_size(bridge: &Bridge) -> Result<(), BridgeError> {
    let body = window()?
        .document()
        .and_then(|document| document.body())
        .ok_or_else(|| BridgeError::Transport("document has no body".into()))?;
    let width = u32::try_from(body.scroll_width()).unwrap_or(0);
    let height = u32::try_from(body.scroll_height()).unwrap_or(0);
    bridge.report_window_size(width, height)
}
