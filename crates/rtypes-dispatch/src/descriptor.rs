//! Inbound operation descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DispatchError, Result};

/// One requested operation against one identified collection.
///
/// Every field is optional at the wire level; [`OperationDescriptor::validate`]
/// enforces which ones are required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Opaque correlation token echoed in the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Args>,
}

/// Operation arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Args {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<IndexArg>,
}

/// A list index, accepted as a JSON integer or a string holding one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexArg {
    Int(i64),
    Text(String),
}

impl IndexArg {
    /// The index as an integer.
    pub fn value(&self) -> Result<i64> {
        match self {
            IndexArg::Int(index) => Ok(*index),
            IndexArg::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| DispatchError::malformed(format!("index {:?} is not an integer", text))),
        }
    }
}

impl Args {
    pub fn require_item(&self) -> Result<&str> {
        self.item
            .as_deref()
            .ok_or_else(|| DispatchError::malformed("missing argument `item`"))
    }

    pub fn require_key(&self) -> Result<&str> {
        self.key
            .as_deref()
            .ok_or_else(|| DispatchError::malformed("missing argument `key`"))
    }

    /// The element or key a shared operation applies to: `item`, else `key`.
    pub fn require_target(&self) -> Result<&str> {
        self.item
            .as_deref()
            .or(self.key.as_deref())
            .ok_or_else(|| DispatchError::malformed("missing argument `item`"))
    }

    pub fn require_index(&self) -> Result<i64> {
        self.optional_index()?
            .ok_or_else(|| DispatchError::malformed("missing argument `index`"))
    }

    pub fn optional_index(&self) -> Result<Option<i64>> {
        self.index.as_ref().map(IndexArg::value).transpose()
    }
}

/// A descriptor whose required fields are known to be present.
#[derive(Debug, Clone, Copy)]
pub struct ValidOperation<'a> {
    pub object_type: &'a str,
    pub object_identifier: &'a str,
    pub operation: &'a str,
    pub args: &'a Args,
}

static NO_ARGS: Args = Args {
    item: None,
    key: None,
    index: None,
};

impl OperationDescriptor {
    /// Checks that `id`, `object_type`, `object_identifier` and `operation`
    /// are all present.
    pub fn validate(&self) -> Result<ValidOperation<'_>> {
        if self.id.as_ref().map_or(true, Value::is_null) {
            return Err(DispatchError::malformed("missing field `id`"));
        }
        let object_type = required(&self.object_type, "object_type")?;
        let object_identifier = required(&self.object_identifier, "object_identifier")?;
        let operation = required(&self.operation, "operation")?;
        Ok(ValidOperation {
            object_type,
            object_identifier,
            operation,
            args: self.args.as_ref().unwrap_or(&NO_ARGS),
        })
    }
}

fn required<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str> {
    field
        .as_deref()
        .ok_or_else(|| DispatchError::malformed(format!("missing field `{}`", name)))
}
