//! JSON file store for collection records.

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{trace, warn};

use crate::atomic::{read_document, write_document};
use crate::error::{PersistenceError, Result};
use crate::store::CollectionStore;

/// How identifiers map onto files inside the storage directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileLayout {
    /// One file per identifier, named `{prefix}_{identifier}.json`.
    PerIdentifier { prefix: String },
    /// A single file holding the records of every identifier.
    Shared { file_name: String },
}

/// Stores collection records as JSON documents of the form `{identifier: state}`.
///
/// ```text
/// storage/
/// ├── rdict_D1.json      {"D1": {"k": "v"}}
/// ├── rlist_L1.json      {"L1": ["x", "y"]}
/// └── rset_data.json     {"S1": ["a"], "S2": ["b", "c"]}
/// ```
///
/// Saving reads the current document, replaces the identifier's record and
/// rewrites the whole file, so records of other identifiers sharing the same
/// file survive. A record that cannot be decoded as `S` loads as absent.
pub struct JsonFileStore<S> {
    dir: PathBuf,
    layout: FileLayout,
    _state: PhantomData<fn() -> S>,
}

impl<S> JsonFileStore<S> {
    /// Creates a store with an explicit layout.
    pub fn new(dir: impl Into<PathBuf>, layout: FileLayout) -> Self {
        Self {
            dir: dir.into(),
            layout,
            _state: PhantomData,
        }
    }

    /// Creates a store that writes one file per identifier.
    pub fn per_identifier(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self::new(
            dir,
            FileLayout::PerIdentifier {
                prefix: prefix.into(),
            },
        )
    }

    /// Creates a store that keeps every identifier in one shared file.
    pub fn shared(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self::new(
            dir,
            FileLayout::Shared {
                file_name: file_name.into(),
            },
        )
    }

    /// Returns the storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the layout used by this store.
    pub fn layout(&self) -> &FileLayout {
        &self.layout
    }

    /// Returns the file that holds the record for `identifier`.
    pub fn path_for(&self, identifier: &str) -> PathBuf {
        match &self.layout {
            FileLayout::PerIdentifier { prefix } => {
                self.dir.join(format!("{}_{}.json", prefix, identifier))
            }
            FileLayout::Shared { file_name } => self.dir.join(file_name),
        }
    }

    /// Creates the storage directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|source| PersistenceError::DirectoryError {
                path: self.dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl<S> CollectionStore<S> for JsonFileStore<S>
where
    S: Serialize + DeserializeOwned,
{
    fn load(&self, identifier: &str) -> Result<Option<S>> {
        let path = self.path_for(identifier);
        let mut document = read_document(&path)?;

        let Some(record) = document.remove(identifier) else {
            return Ok(None);
        };

        match serde_json::from_value(record) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    identifier = %identifier,
                    error = %e,
                    "record has unexpected shape, treating as empty"
                );
                Ok(None)
            }
        }
    }

    fn save(&self, identifier: &str, state: &S) -> Result<()> {
        self.ensure_dir()?;
        let path = self.path_for(identifier);

        let mut document = read_document(&path)?;
        document.insert(identifier.to_string(), serde_json::to_value(state)?);
        write_document(&path, &document)?;

        trace!(path = %path.display(), identifier = %identifier, "record saved");
        Ok(())
    }
}
