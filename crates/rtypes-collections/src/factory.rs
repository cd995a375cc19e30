//! Singleton-per-identifier collection factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rtypes_persistence::{CollectionStore, JsonFileStore, MemoryStore};
use tracing::{info, trace};

use crate::dict::{DictState, RDict};
use crate::error::{CollectionError, FactoryError};
use crate::exposure::{Exposure, LocalExposure, ProxyId};
use crate::handle::Handle;
use crate::list::{ListState, RList};
use crate::set::{RSet, SetState};
use crate::type_name::TypeName;

/// Name of the file shared by every set.
pub const SET_FILE_NAME: &str = "rset_data.json";

/// One persistence port per collection type.
#[derive(Clone)]
pub struct StoreSet {
    pub dict: Arc<dyn CollectionStore<DictState>>,
    pub list: Arc<dyn CollectionStore<ListState>>,
    pub set: Arc<dyn CollectionStore<SetState>>,
}

impl StoreSet {
    /// JSON files under `dir`: `rdict_{id}.json`, `rlist_{id}.json` and a
    /// shared `rset_data.json`.
    pub fn json(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            dict: Arc::new(JsonFileStore::<DictState>::per_identifier(&dir, "rdict")),
            list: Arc::new(JsonFileStore::<ListState>::per_identifier(&dir, "rlist")),
            set: Arc::new(JsonFileStore::<SetState>::shared(&dir, SET_FILE_NAME)),
        }
    }

    /// Process-local stores; nothing touches the disk.
    pub fn memory() -> Self {
        Self {
            dict: Arc::new(MemoryStore::<DictState>::new()),
            list: Arc::new(MemoryStore::<ListState>::new()),
            set: Arc::new(MemoryStore::<SetState>::new()),
        }
    }
}

struct Registered {
    handle: Handle,
    proxy: ProxyId,
}

/// Hands out exactly one live instance per (type, identifier) pair.
///
/// Instances are created lazily on first access and cached for the lifetime
/// of the factory. Every new instance is passed to the factory's
/// [`Exposure`] once.
pub struct ObjectFactory {
    stores: StoreSet,
    exposure: Arc<dyn Exposure>,
    registry: Mutex<HashMap<(TypeName, String), Registered>>,
}

impl ObjectFactory {
    /// Creates a factory over `stores` with a [`LocalExposure`].
    pub fn new(stores: StoreSet) -> Self {
        Self::with_exposure(stores, Arc::new(LocalExposure::new()))
    }

    pub fn with_exposure(stores: StoreSet, exposure: Arc<dyn Exposure>) -> Self {
        Self {
            stores,
            exposure,
            registry: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a factory backed by JSON files in `dir`, creating the directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, FactoryError> {
        let dir = dir.as_ref();
        JsonFileStore::<ListState>::per_identifier(dir, "rlist")
            .ensure_dir()
            .map_err(CollectionError::from)?;
        Ok(Self::new(StoreSet::json(dir)))
    }

    /// Returns the instance for `(type_name, identifier)`, creating it on first access.
    ///
    /// A missing or empty identifier selects the type's default identifier.
    pub fn get(&self, type_name: TypeName, identifier: Option<&str>) -> Result<Handle, FactoryError> {
        let identifier = resolve_identifier(type_name, identifier)?;
        let mut registry = self
            .registry
            .lock()
            .map_err(|e| FactoryError::LockPoisoned(e.to_string()))?;

        let key = (type_name, identifier);
        if let Some(registered) = registry.get(&key) {
            trace!(object_type = %type_name, identifier = %key.1, "factory cache hit");
            return Ok(registered.handle.clone());
        }

        let handle = self.create(type_name, &key.1)?;
        let proxy = self.exposure.expose(&handle);
        info!(
            object_type = %type_name,
            identifier = %key.1,
            proxy = %proxy,
            "created collection instance"
        );
        registry.insert(
            key,
            Registered {
                handle: handle.clone(),
                proxy,
            },
        );
        Ok(handle)
    }

    /// Like [`get`](Self::get), with the type given by its wire name.
    pub fn get_by_name(&self, type_name: &str, identifier: Option<&str>) -> Result<Handle, FactoryError> {
        self.get(type_name.parse()?, identifier)
    }

    /// Proxy id the instance was exposed under, if it has been created.
    pub fn proxy_of(&self, type_name: TypeName, identifier: &str) -> Option<ProxyId> {
        let registry = self.registry.lock().ok()?;
        registry
            .get(&(type_name, identifier.to_string()))
            .map(|registered| registered.proxy.clone())
    }

    /// True if the instance has already been created.
    pub fn contains(&self, type_name: TypeName, identifier: &str) -> bool {
        self.registry
            .lock()
            .map(|registry| registry.contains_key(&(type_name, identifier.to_string())))
            .unwrap_or(false)
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.registry.lock().map(|registry| registry.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn create(&self, type_name: TypeName, identifier: &str) -> Result<Handle, CollectionError> {
        let handle = match type_name {
            TypeName::RDict => Handle::dict(RDict::open(identifier, Arc::clone(&self.stores.dict))?),
            TypeName::RList => Handle::list(RList::open(identifier, Arc::clone(&self.stores.list))?),
            TypeName::RSet => Handle::set(RSet::open(identifier, Arc::clone(&self.stores.set))?),
        };
        Ok(handle)
    }
}

/// Picks the default identifier when none is given and rejects identifiers
/// that cannot be embedded in a file name.
fn resolve_identifier(type_name: TypeName, identifier: Option<&str>) -> Result<String, FactoryError> {
    let identifier = match identifier {
        Some(id) if !id.is_empty() => id,
        _ => return Ok(type_name.default_identifier().to_string()),
    };
    if identifier.contains(['/', '\\', '\0']) || identifier.contains("..") {
        return Err(FactoryError::InvalidIdentifier(identifier.to_string()));
    }
    Ok(identifier.to_string())
}
