//! Persistence layer for remote collections.
//!
//! Collections never touch the file system directly. Each collection type is
//! handed a [`CollectionStore`] (the persistence port) and calls
//! [`CollectionStore::save`] synchronously after every state change.
//!
//! Two implementations are provided:
//! - [`JsonFileStore`]: JSON documents of the form `{identifier: state}`,
//!   rewritten in full on every save using an atomic temp-file rename.
//! - [`MemoryStore`]: an in-process map, used in tests and for ephemeral
//!   deployments. It can be told to reject writes to simulate a failing disk.
//!
//! # Example
//!
//! ```no_run
//! use rtypes_persistence::{CollectionStore, JsonFileStore};
//!
//! let store: JsonFileStore<Vec<String>> = JsonFileStore::per_identifier("/tmp/rtypes", "rlist");
//! store.save("groceries", &vec!["milk".to_string()]).unwrap();
//!
//! let loaded = store.load("groceries").unwrap();
//! assert_eq!(loaded, Some(vec!["milk".to_string()]));
//! ```

pub mod atomic;
pub mod error;
pub mod file_store;
pub mod memory;
pub mod store;

pub use error::{PersistenceError, Result};
pub use file_store::{FileLayout, JsonFileStore};
pub use memory::MemoryStore;
pub use store::CollectionStore;
