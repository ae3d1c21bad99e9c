use std::time::Duration;

use futures::channel::mpsc;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::error::BridgeError;

/// Delivers a message to the opposite window.
///
/// Delivery is fire-and-forget: `Ok` means the message was handed off, not
/// that anyone received it.
pub trait Transport: Send + Sync {
    fn post(&self, message: &Value, target_origin: &str) -> Result<(), BridgeError>;
}

/// Runs detached tasks: data-message callbacks and call deadlines.
pub trait Spawn: Send + Sync {
    fn spawn(&self, task: BoxFuture<'static, ()>);

    /// A future completing after `duration`, suitable for [`spawn`](Self::spawn).
    /// `None` when no timer is available, in which case call timeouts are not
    /// enforced.
    fn timer(&self, _duration: Duration) -> Option<BoxFuture<'static, ()>> {
        None
    }
}

/// A message handed to a [`ChannelTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct Posted {
    pub message: Value,
    pub target_origin: String,
}

/// In-process transport backed by an unbounded channel.
///
/// Used to connect an object-side bridge to an in-process host, and by
/// tests to observe outbound traffic.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<Posted>,
}

impl ChannelTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Posted>) {
        let (tx, rx) = mpsc::unbounded();
        (ChannelTransport { tx }, rx)
    }
}

impl Transport for ChannelTransport {
    fn post(&self, message: &Value, target_origin: &str) -> Result<(), BridgeError> {
        self.tx
            .unbounded_send(Posted {
                message: message.clone(),
                target_origin: target_origin.to_string(),
            })
            .map_err(|_| BridgeError::Transport("receiving side closed".into()))
    }
}

/// Spawns detached tasks on the current tokio runtime.
///
/// Outside a runtime, tasks are dropped with a warning and no timer is
/// offered.
#[cfg(feature = "tokio")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

#[cfg(feature = "tokio")]
impl Spawn for TokioSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(task);
            }
            Err(_) => tracing::warn!("no tokio runtime; detached task dropped"),
        }
    }

    fn timer(&self, duration: Duration) -> Option<BoxFuture<'static, ()>> {
        // `sleep` registers with the runtime's timer when created.
        tokio::runtime::Handle::try_current().ok()?;
        Some(Box::pin(tokio::time::sleep(duration)))
    }
}
