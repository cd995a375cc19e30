//! Persistent collection types for RemoteTypes.
//!
//! This crate provides the object model behind the remote collections:
//! - [`RDict`], [`RList`] and [`RSet`], each saving its full state through a
//!   [`CollectionStore`](rtypes_persistence::CollectionStore) after every
//!   state change
//! - the [`RType`] capability trait shared by all three types
//! - [`SnapshotIterator`], a fail-fast iterator that is cancelled as soon as
//!   its source collection changes
//! - [`ObjectFactory`], which hands out exactly one live [`Handle`] per
//!   (type, identifier) pair
//!
//! # Example
//!
//! ```no_run
//! use rtypes_collections::{IterStep, ObjectFactory, RType, TypeName};
//!
//! let factory = ObjectFactory::open("/tmp/rtypes").unwrap();
//! let handle = factory.get(TypeName::RList, Some("groceries")).unwrap();
//!
//! let list = handle.as_list().unwrap();
//! let mut list = list.lock().unwrap();
//! list.append("milk").unwrap();
//!
//! let mut iter = list.iter();
//! assert_eq!(iter.next_step(), IterStep::Item("milk".to_string()));
//! ```
//!
//! # Concurrency
//!
//! Each handle wraps its collection in `Arc<Mutex<_>>` so it can be shared,
//! but operations against one identifier are expected to arrive from a single
//! consuming loop. Iterators do not hold the lock; they compare a captured
//! modification count with the live one on every step.

pub mod counter;
pub mod dict;
pub mod error;
pub mod exposure;
pub mod factory;
pub mod handle;
pub mod iterator;
pub mod list;
mod persistent;
pub mod rtype;
pub mod set;
pub mod type_name;

pub use counter::{CounterWatch, ModificationCounter};
pub use dict::{DictState, RDict};
pub use error::{CastError, CollectionError, FactoryError, IterationCancelled, Result};
pub use exposure::{Exposure, LocalExposure, ProxyId};
pub use factory::{ObjectFactory, StoreSet};
pub use handle::{Handle, Shared};
pub use iterator::{IterStep, SnapshotIterator};
pub use list::{ListState, RList};
pub use rtype::RType;
pub use set::{RSet, SetState};
pub use type_name::TypeName;
