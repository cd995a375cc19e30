//! Batch decoding and response aggregation.
//!
//! An inbound payload is a JSON array of descriptors. Entries are executed
//! strictly in order and each correlated entry yields one response record.
//! A payload that is not a JSON array is dropped as a whole.

use serde_json::Value;
use tracing::{debug, warn};

use crate::descriptor::OperationDescriptor;
use crate::dispatcher::OperationDispatcher;
use crate::error::{DispatchError, TransportError};
use crate::response::ResponseRecord;

/// Decodes a payload into its raw entries.
pub fn decode_batch(payload: &str) -> Result<Vec<Value>, TransportError> {
    match serde_json::from_str::<Value>(payload)? {
        Value::Array(entries) => Ok(entries),
        other => Err(TransportError::NotAnArray(json_kind(&other))),
    }
}

/// Encodes a response batch as a single JSON line.
pub fn encode_batch(records: &[ResponseRecord]) -> Result<String, TransportError> {
    Ok(serde_json::to_string(records)?)
}

impl OperationDispatcher {
    /// Executes every entry in order and collects the response records.
    ///
    /// Entries without an `id` cannot be correlated and produce no record.
    pub fn run_batch(&self, entries: Vec<Value>) -> Vec<ResponseRecord> {
        let mut records = Vec::with_capacity(entries.len());
        for (position, entry) in entries.into_iter().enumerate() {
            let id = match correlation_id(&entry) {
                Some(id) => id,
                None => {
                    warn!(position, "descriptor without id skipped");
                    continue;
                }
            };

            let outcome = serde_json::from_value::<OperationDescriptor>(entry)
                .map_err(|e| DispatchError::malformed(e.to_string()))
                .and_then(|descriptor| self.execute(&descriptor));

            if let Err(e) = &outcome {
                warn!(
                    id = %id,
                    code = e.code(),
                    detail = e.detail().unwrap_or_default(),
                    "operation failed"
                );
            }
            records.push(ResponseRecord::from_outcome(id, &outcome));
        }
        records
    }

    /// Decodes `payload`, runs it and returns the records to publish.
    ///
    /// Returns `Ok(None)` when no record was produced, in which case nothing
    /// should be published.
    pub fn process_payload(&self, payload: &str) -> Result<Option<Vec<ResponseRecord>>, TransportError> {
        let entries = decode_batch(payload)?;
        let batch_len = entries.len();
        let records = self.run_batch(entries);
        debug!(batch_len, records = records.len(), "batch processed");
        Ok((!records.is_empty()).then_some(records))
    }
}

fn correlation_id(entry: &Value) -> Option<Value> {
    entry
        .as_object()
        .and_then(|object| object.get("id"))
        .filter(|id| !id.is_null())
        .cloned()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
