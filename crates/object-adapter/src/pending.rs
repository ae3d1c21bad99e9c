use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use serde_json::Value;

use crate::error::BridgeError;

pub(crate) type Outcome = Result<Value, BridgeError>;

/// Future of an in-flight call.
///
/// The request is already posted when this value exists. Dropping it only
/// stops listening: the entry stays in the pending table until the host
/// answers, the bridge stops, or the configured call timeout expires.
pub struct PendingCall {
    id: String,
    function: String,
    receiver: Option<oneshot::Receiver<Outcome>>,
    error: Option<BridgeError>,
}

impl PendingCall {
    pub(crate) fn waiting(id: String, function: String, receiver: oneshot::Receiver<Outcome>) -> Self {
        PendingCall {
            id,
            function,
            receiver: Some(receiver),
            error: None,
        }
    }

    /// A call that failed before anything was posted.
    pub(crate) fn failed(id: String, function: String, error: BridgeError) -> Self {
        PendingCall {
            id,
            function,
            receiver: None,
            error: Some(error),
        }
    }

    /// Correlation id carried by the request.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn function(&self) -> &str {
        &self.function
    }
}

impl Future for PendingCall {
    type Output = Result<Value, BridgeError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if let Some(error) = this.error.take() {
            return Poll::Ready(Err(error));
        }
        let Some(receiver) = this.receiver.as_mut() else {
            return Poll::Ready(Err(BridgeError::Stopped));
        };
        let outcome = futures::ready!(Pin::new(receiver).poll(cx));
        this.receiver = None;
        // A cancelled sender means the bridge went away.
        Poll::Ready(outcome.unwrap_or_else(|_| Err(BridgeError::Stopped)))
    }
}

/// Completion of a fire-and-forget call. Resolves once the host
/// acknowledges; safe to drop without awaiting.
pub struct Acknowledgement {
    call: PendingCall,
}

impl Acknowledgement {
    pub(crate) fn new(call: PendingCall) -> Self {
        Acknowledgement { call }
    }

    pub fn id(&self) -> &str {
        self.call.id()
    }
}

impl Future for Acknowledgement {
    type Output = Result<(), BridgeError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().call)
            .poll(cx)
            .map(|outcome| outcome.map(|_| ()))
    }
}
