//! Maps operation descriptors onto collection instances.

use std::sync::{Arc, Mutex, MutexGuard};

use rtypes_collections::{Handle, ObjectFactory, RDict, RList, RSet, RType};
use serde_json::Value;
use tracing::{debug, warn};

use crate::descriptor::{Args, OperationDescriptor};
use crate::error::{DispatchError, Result};

/// Executes descriptors against the instances of an [`ObjectFactory`].
///
/// Shared operations are tried first, then the table of the resolved type.
/// An operation name neither table knows succeeds with no result.
#[derive(Clone)]
pub struct OperationDispatcher {
    factory: Arc<ObjectFactory>,
}

impl OperationDispatcher {
    pub fn new(factory: Arc<ObjectFactory>) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &ObjectFactory {
        &self.factory
    }

    /// Runs one descriptor. `Ok(None)` means success without a value.
    pub fn execute(&self, descriptor: &OperationDescriptor) -> Result<Option<Value>> {
        let op = descriptor.validate()?;
        debug!(
            object_type = %op.object_type,
            identifier = %op.object_identifier,
            operation = %op.operation,
            "executing operation"
        );

        let handle = self
            .factory
            .get_by_name(op.object_type, Some(op.object_identifier))?;

        if let Some(outcome) = shared_operation(&handle, op.operation, op.args) {
            return outcome;
        }

        match &handle {
            Handle::Dict(dict) => dict_operation(&mut *lock(dict)?, op.operation, op.args),
            Handle::List(list) => list_operation(&mut *lock(list)?, op.operation, op.args),
            Handle::Set(set) => set_operation(&mut *lock(set)?, op.operation, op.args),
        }
    }
}

/// Returns `None` if `operation` is not a shared operation.
fn shared_operation(handle: &Handle, operation: &str, args: &Args) -> Option<Result<Option<Value>>> {
    let outcome = match operation {
        "identifier" => handle
            .with(|c| Value::from(c.identifier()))
            .map(Some)
            .map_err(DispatchError::from),
        "length" => handle
            .with(|c| Value::from(c.length()))
            .map(Some)
            .map_err(DispatchError::from),
        "hash" => handle
            .with(|c| Value::from(c.hash()))
            .map(Some)
            .map_err(DispatchError::from),
        "contains" => args.require_target().and_then(|item| {
            handle
                .with(|c| Value::from(c.contains(item)))
                .map(Some)
                .map_err(DispatchError::from)
        }),
        "remove" => args.require_target().and_then(|item| {
            handle.with(|c| c.remove(item))??;
            Ok(None)
        }),
        "iter" => Err(DispatchError::OperationNotSupported(
            "iteration cannot cross a batch boundary".to_string(),
        )),
        _ => return None,
    };
    Some(outcome)
}

fn dict_operation(dict: &mut RDict, operation: &str, args: &Args) -> Result<Option<Value>> {
    match operation {
        "setItem" => {
            dict.set_item(args.require_key()?, args.require_item()?)?;
            Ok(None)
        }
        "getItem" => Ok(Some(dict.get_item(args.require_key()?)?.into())),
        "pop" => Ok(Some(dict.pop(args.require_key()?)?.into())),
        other => Ok(ignored(&*dict, other)),
    }
}

fn list_operation(list: &mut RList, operation: &str, args: &Args) -> Result<Option<Value>> {
    match operation {
        "append" => {
            list.append(args.require_item()?)?;
            Ok(None)
        }
        "getItem" => Ok(Some(list.get_item(args.require_index()?)?.into())),
        "pop" => Ok(Some(list.pop(args.optional_index()?)?.into())),
        other => Ok(ignored(&*list, other)),
    }
}

fn set_operation(set: &mut RSet, operation: &str, args: &Args) -> Result<Option<Value>> {
    match operation {
        "add" => {
            set.add(args.require_item()?)?;
            Ok(None)
        }
        "pop" => Ok(Some(set.pop()?.into())),
        other => Ok(ignored(&*set, other)),
    }
}

fn ignored(collection: &dyn RType, operation: &str) -> Option<Value> {
    debug!(
        object_type = %collection.type_name(),
        identifier = %collection.identifier(),
        operation = %operation,
        "unknown operation ignored"
    );
    None
}

fn lock<T>(shared: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    shared.lock().map_err(|e| {
        warn!(error = %e, "collection lock poisoned");
        DispatchError::Internal(format!("lock poisoned: {}", e))
    })
}
