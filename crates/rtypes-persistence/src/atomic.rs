//! Whole-file JSON documents with crash-safe replacement.
//!
//! Every save rewrites the complete document: the new content goes to a
//! temporary file in the target directory, is flushed, and is then renamed
//! over the old file. Readers never observe a half-written document.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{PersistenceError, Result};

/// A JSON document whose top level is an object keyed by identifier.
pub type Document = Map<String, Value>;

/// Replaces the contents of `path` with `data`.
///
/// Missing parent directories are created first.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let write_err = |source: io::Error| PersistenceError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| PersistenceError::DirectoryError {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    temp.write_all(data).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}

/// Serializes `document` as pretty JSON and atomically replaces `path`.
pub fn write_document(path: &Path, document: &Document) -> Result<()> {
    let json = serde_json::to_vec_pretty(document)?;
    atomic_write(path, &json)
}

/// Reads the document at `path`.
///
/// A missing file, an empty file, invalid JSON (including bytes that are not
/// UTF-8), or a top level that is not an object all yield an empty document. Only genuine I/O failures (for
/// example a permission error) are reported.
pub fn read_document(path: &Path) -> Result<Document> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Document::new()),
        Err(source) => {
            return Err(PersistenceError::ReadError {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Document::new());
    }

    match serde_json::from_slice::<Value>(&raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => {
            warn!(
                path = %path.display(),
                found = json_kind(&other),
                "backing file is not a JSON object, treating as empty"
            );
            Ok(Document::new())
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "backing file is malformed, treating as empty"
            );
            Ok(Document::new())
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
