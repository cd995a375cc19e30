//! Shared handles to live collection instances.

use std::sync::{Arc, Mutex};

use crate::dict::RDict;
use crate::error::{CastError, CollectionError, Result};
use crate::list::RList;
use crate::rtype::RType;
use crate::set::RSet;
use crate::type_name::TypeName;

/// A collection shared between the factory and its callers.
pub type Shared<T> = Arc<Mutex<T>>;

/// Reference to one live collection instance.
///
/// Cloning a handle clones the reference, not the collection.
#[derive(Clone)]
pub enum Handle {
    Dict(Shared<RDict>),
    List(Shared<RList>),
    Set(Shared<RSet>),
}

impl Handle {
    pub(crate) fn dict(dict: RDict) -> Self {
        Handle::Dict(Arc::new(Mutex::new(dict)))
    }

    pub(crate) fn list(list: RList) -> Self {
        Handle::List(Arc::new(Mutex::new(list)))
    }

    pub(crate) fn set(set: RSet) -> Self {
        Handle::Set(Arc::new(Mutex::new(set)))
    }

    /// Kind of the referenced collection.
    pub fn type_name(&self) -> TypeName {
        match self {
            Handle::Dict(_) => TypeName::RDict,
            Handle::List(_) => TypeName::RList,
            Handle::Set(_) => TypeName::RSet,
        }
    }

    /// Runs `f` against the collection through its common [`RType`] interface.
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn RType) -> R) -> Result<R> {
        match self {
            Handle::Dict(dict) => {
                let mut dict = dict
                    .lock()
                    .map_err(|e| CollectionError::LockPoisoned(e.to_string()))?;
                Ok(f(&mut *dict))
            }
            Handle::List(list) => {
                let mut list = list
                    .lock()
                    .map_err(|e| CollectionError::LockPoisoned(e.to_string()))?;
                Ok(f(&mut *list))
            }
            Handle::Set(set) => {
                let mut set = set
                    .lock()
                    .map_err(|e| CollectionError::LockPoisoned(e.to_string()))?;
                Ok(f(&mut *set))
            }
        }
    }

    /// Identifier of the referenced collection.
    pub fn identifier(&self) -> Result<String> {
        self.with(|collection| collection.identifier().to_string())
    }

    /// Checked cast to a dictionary.
    pub fn as_dict(&self) -> std::result::Result<Shared<RDict>, CastError> {
        match self {
            Handle::Dict(dict) => Ok(Arc::clone(dict)),
            other => Err(other.cast_error(TypeName::RDict)),
        }
    }

    /// Checked cast to a list.
    pub fn as_list(&self) -> std::result::Result<Shared<RList>, CastError> {
        match self {
            Handle::List(list) => Ok(Arc::clone(list)),
            other => Err(other.cast_error(TypeName::RList)),
        }
    }

    /// Checked cast to a set.
    pub fn as_set(&self) -> std::result::Result<Shared<RSet>, CastError> {
        match self {
            Handle::Set(set) => Ok(Arc::clone(set)),
            other => Err(other.cast_error(TypeName::RSet)),
        }
    }

    /// True if both handles refer to the same live instance.
    pub fn same_instance(&self, other: &Handle) -> bool {
        match (self, other) {
            (Handle::Dict(a), Handle::Dict(b)) => Arc::ptr_eq(a, b),
            (Handle::List(a), Handle::List(b)) => Arc::ptr_eq(a, b),
            (Handle::Set(a), Handle::Set(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn cast_error(&self, expected: TypeName) -> CastError {
        CastError {
            expected,
            actual: self.type_name(),
        }
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Handle").field(&self.type_name()).finish()
    }
}
