//! Operation dispatch for RemoteTypes.
//!
//! Turns inbound batches of [`OperationDescriptor`]s into
//! [`ResponseRecord`]s:
//!
//! ```text
//! payload ──decode──► [descriptor] ──execute──► ObjectFactory.get ──► collection
//!                                                                        │
//! [record] ◄────────────────────── result / DispatchError ◄──────────────┘
//! ```
//!
//! One failing operation never aborts its siblings. A payload that is not a
//! JSON array fails with [`TransportError`] and yields no records at all.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rtypes_collections::{ObjectFactory, StoreSet};
//! use rtypes_dispatch::OperationDispatcher;
//!
//! let dispatcher = OperationDispatcher::new(Arc::new(ObjectFactory::new(StoreSet::memory())));
//! let payload = r#"[{"id": 1, "object_type": "RSet", "object_identifier": "S1",
//!                    "operation": "add", "args": {"item": "x"}}]"#;
//!
//! let records = dispatcher.process_payload(payload).unwrap().unwrap();
//! assert!(records[0].is_ok());
//! ```

pub mod batch;
pub mod descriptor;
pub mod dispatcher;
pub mod error;
pub mod response;

pub use batch::{decode_batch, encode_batch};
pub use descriptor::{Args, IndexArg, OperationDescriptor, ValidOperation};
pub use dispatcher::OperationDispatcher;
pub use error::{DispatchError, Result, TransportError};
pub use response::{ResponseRecord, Status};
