//! Publishing collection instances under stable proxy ids.
//!
//! The factory hands every new instance to an [`Exposure`] exactly once and
//! keeps the returned [`ProxyId`]. Repeated lookups of the same
//! (type, identifier) pair return that same proxy id.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::handle::Handle;

/// Reference under which an exposed instance can be reached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyId(String);

impl ProxyId {
    /// Creates a new random proxy id.
    pub fn new() -> Self {
        Self(format!("prx-{}", Uuid::new_v4()))
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProxyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProxyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Makes instances reachable from outside the factory.
pub trait Exposure: Send + Sync {
    /// Registers `handle` and returns the id it can be reached under.
    fn expose(&self, handle: &Handle) -> ProxyId;
}

/// In-process exposure: proxy ids resolve to handles through a table.
#[derive(Default)]
pub struct LocalExposure {
    handles: RwLock<HashMap<ProxyId, Handle>>,
}

impl LocalExposure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the handle registered under `proxy`.
    pub fn resolve(&self, proxy: &ProxyId) -> Option<Handle> {
        self.handles
            .read()
            .ok()
            .and_then(|handles| handles.get(proxy).cloned())
    }

    /// Number of exposed instances.
    pub fn len(&self) -> usize {
        self.handles.read().map(|handles| handles.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Exposure for LocalExposure {
    fn expose(&self, handle: &Handle) -> ProxyId {
        let proxy = ProxyId::new();
        match self.handles.write() {
            Ok(mut handles) => {
                handles.insert(proxy.clone(), handle.clone());
            }
            Err(e) => {
                // The id is still returned; it just won't resolve locally.
                warn!(error = %e, "exposure table poisoned");
            }
        }
        debug!(proxy = %proxy, type_name = %handle.type_name(), "exposed instance");
        proxy
    }
}
