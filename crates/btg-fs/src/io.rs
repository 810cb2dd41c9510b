//! Atomic structured-document I/O with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;
use serde_json::Value;

use crate::{Error, Mapping, Result};

/// Read a JSON document whose top level is an object.
///
/// Returns [`Error::Io`] when the file cannot be read, [`Error::Parse`] when
/// the content is not valid JSON and [`Error::NotAMapping`] when it is valid
/// JSON of another shape.
pub fn read_structured_file(path: impl AsRef<Path>) -> Result<Mapping> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

    let value: Value = serde_json::from_str(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(map) => {
            tracing::debug!(path = %path.display(), fields = map.len(), "Read structured document");
            Ok(map)
        }
        other => Err(Error::NotAMapping {
            path: path.to_path_buf(),
            found: kind_of(&other),
        }),
    }
}

/// Write a JSON object to `path` atomically.
///
/// With `pretty` set the document is indented and ends with a newline.
/// Field order follows the map's iteration order, which is sorted by key.
pub fn write_structured_file(path: impl AsRef<Path>, document: &Mapping, pretty: bool) -> Result<()> {
    let path = path.as_ref();

    let rendered = if pretty {
        serde_json::to_string_pretty(document).map(|mut s| {
            s.push('\n');
            s
        })
    } else {
        serde_json::to_string(document)
    }
    .map_err(|source| Error::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    write_atomic(path, rendered.as_bytes())?;
    tracing::debug!(path = %path.display(), bytes = rendered.len(), "Wrote structured document");
    Ok(())
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes.
/// Acquires an advisory lock on the temp file while it is being filled.
pub fn write_atomic(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    let written = fill_locked(&mut temp_file, content, path, &temp_path);
    drop(temp_file);

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::io(path, e)
    })
}

fn fill_locked(file: &mut fs::File, content: &[u8], target: &Path, temp_path: &Path) -> Result<()> {
    file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })?;

    file.write_all(content).map_err(|e| Error::io(temp_path, e))?;
    file.sync_all().map_err(|e| Error::io(temp_path, e))?;

    file.unlock().map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn kind_of_names_every_json_shape() {
        assert_eq!(kind_of(&Value::Null), "null");
        assert_eq!(kind_of(&json!(true)), "a boolean");
        assert_eq!(kind_of(&json!(1.5)), "a number");
        assert_eq!(kind_of(&json!("x")), "a string");
        assert_eq!(kind_of(&json!([1])), "an array");
        assert_eq!(kind_of(&json!({})), "an object");
    }

    #[test]
    fn write_atomic_creates_file_in_existing_directory() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("bare.json");
        write_atomic(&target, b"{}").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "{}");
    }

    #[test]
    fn compact_write_has_no_newlines() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("compact.json");
        let mut doc = Mapping::new();
        doc.insert("b".into(), json!(2));
        doc.insert("a".into(), json!(1));

        write_structured_file(&target, &doc, false).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), r#"{"a":1,"b":2}"#);
    }
}
