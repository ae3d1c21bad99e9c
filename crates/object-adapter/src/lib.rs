//! Request/response bridge between a sandboxed object and its host window.
//!
//! The object side posts `{type: "adapter", function, id, args}` requests to
//! its parent and correlates the host's `{type: "adapter", id, result}`
//! replies by id. The same channel carries host-pushed data messages and
//! context refreshes, which are merged with the capability facade into the
//! [`ObjectArgs`] handed to object code.
//!
//! - [`Bridge`] owns the pending-call table, dispatch, and start/stop.
//! - [`Adapter`] is the typed capability facade.
//! - [`ObjectContext`] adds `send`, `update_store` and `on_view_change`.
//! - [`host`] implements the host side of the same protocol.
//!
//! The transport is pluggable ([`Transport`]); enable the `web` feature for
//! the `postMessage` implementation.

pub mod bridge;
pub mod config;
pub mod context;
pub mod error;
pub mod facade;
pub mod handler;
pub mod host;
pub mod id;
pub mod pending;
pub mod protocol;
pub mod transport;
#[cfg(feature = "web")]
pub mod web;

pub use bridge::{Bridge, Dispatch};
pub use config::{BridgeConfig, TargetOrigin};
pub use context::{ObjectArgs, ObjectContext};
pub use error::BridgeError;
pub use facade::Adapter;
pub use handler::ObjectHandler;
pub use id::CallId;
pub use pending::{Acknowledgement, PendingCall};
pub use protocol::{HostMessage, ObjectMessage, ResponseResult};
pub use transport::{ChannelTransport, Posted, Spawn, Transport};
#[cfg(feature = "tokio")]
pub use transport::TokioSpawner;

pub use object_types;
