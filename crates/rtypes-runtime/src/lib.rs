//! Async runtime for RemoteTypes.
//!
//! This crate hosts the single consuming loop in front of the dispatcher:
//! - [`InboundChannel`] / [`OutboundChannel`] - where batches come from and go to
//! - [`BatchConsumer`] - takes one payload, runs every operation in it, then
//!   publishes the response batch
//! - [`Runtime`] - spawns the consumer and handles graceful shutdown
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rtypes_collections::ObjectFactory;
//! use rtypes_dispatch::OperationDispatcher;
//! use rtypes_runtime::{LineInbound, LineOutbound, Runtime, RuntimeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let factory = Arc::new(ObjectFactory::open("./storage")?);
//!     let mut runtime = Runtime::new(OperationDispatcher::new(factory), RuntimeConfig::default());
//!
//!     runtime.start(LineInbound::stdin(), LineOutbound::stdout())?;
//!
//!     let finished = tokio::select! {
//!         stats = runtime.wait() => Some(stats),
//!         _ = tokio::signal::ctrl_c() => None,
//!     };
//!     let stats = match finished {
//!         Some(stats) => stats?,
//!         None => runtime.shutdown().await?,
//!     };
//!     println!("{:?}", stats);
//!     Ok(())
//! }
//! ```
//!
//! Batches are never processed concurrently, so operations against one
//! collection are serialized by construction.

pub mod channel;
pub mod config;
pub mod consumer;
pub mod error;
pub mod runtime;

pub use channel::{
    memory_inbound, memory_outbound, InboundChannel, LineInbound, LineOutbound, MemoryInbound,
    MemoryOutbound, OutboundChannel,
};
pub use config::RuntimeConfig;
pub use consumer::{BatchConsumer, ConsumerStats};
pub use error::{Result, RuntimeError};
pub use runtime::Runtime;
