//! Outbound response records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DispatchError;

/// Outcome of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// Response to one descriptor.
///
/// `result` is present only on success with a value, `error` only on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub id: Value,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseRecord {
    pub fn ok(id: Value, result: Option<Value>) -> Self {
        Self {
            id,
            status: Status::Ok,
            result,
            error: None,
        }
    }

    pub fn error(id: Value, error: &DispatchError) -> Self {
        Self {
            id,
            status: Status::Error,
            result: None,
            error: Some(error.to_string()),
        }
    }

    /// Builds the record for the outcome of an operation.
    pub fn from_outcome(id: Value, outcome: &Result<Option<Value>, DispatchError>) -> Self {
        match outcome {
            Ok(result) => Self::ok(id, result.clone()),
            Err(e) => Self::error(id, e),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_without_result_omits_field() {
        let record = ResponseRecord::ok(json!("op-1"), None);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"id": "op-1", "status": "ok"})
        );
    }

    #[test]
    fn test_ok_with_result() {
        let record = ResponseRecord::ok(json!(7), Some(json!(3)));
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"id": 7, "status": "ok", "result": 3})
        );
    }

    #[test]
    fn test_error_has_no_result() {
        let record = ResponseRecord::error(json!("op-2"), &DispatchError::KeyNotFound("k".into()));
        assert!(!record.is_ok());
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"id": "op-2", "status": "error", "error": "KeyNotFound: k"})
        );
    }
}
