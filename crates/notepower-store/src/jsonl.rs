//! Line-delimited JSON helpers.

use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::atomic::write_with;
use crate::error::StoreError;

/// Reads every non-blank line of `path` as `T`, failing on the first bad line.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read and
/// [`StoreError::Parse`] with the 1-based line number of the first invalid line.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let mut out = Vec::new();
    for (line_no, line) in lines(path)? {
        let item = serde_json::from_str(&line).map_err(|source| StoreError::Parse {
            path: path.display().to_string(),
            line: line_no,
            source,
        })?;
        out.push(item);
    }
    Ok(out)
}

/// Like [`read_jsonl`] but skips invalid lines with a warning.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read.
pub fn read_jsonl_lenient<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let mut out = Vec::new();
    let mut skipped = 0usize;
    for (line_no, line) in lines(path)? {
        match serde_json::from_str(&line) {
            Ok(item) => out.push(item),
            Err(e) => {
                skipped += 1;
                tracing::warn!(
                    path = %path.display(),
                    line = line_no,
                    error = %e,
                    "skipping unparseable line"
                );
            }
        }
    }
    if skipped > 0 {
        tracing::warn!(path = %path.display(), skipped, "some lines could not be read");
    }
    Ok(out)
}

/// Atomically replaces `path` with one JSON line per item.
///
/// Returns the number of lines written.
///
/// # Errors
///
/// Returns [`StoreError`] if serialization or any file operation fails.
pub fn write_jsonl<T: Serialize>(path: &Path, items: &[T]) -> Result<usize, StoreError> {
    write_with(path, |w| {
        for item in items {
            serde_json::to_writer(&mut *w, item).map_err(|e| StoreError::serialize(path, e))?;
            w.write_all(b"\n").map_err(|e| StoreError::io(path, e))?;
        }
        Ok(())
    })?;
    Ok(items.len())
}

fn lines(path: &Path) -> Result<Vec<(usize, String)>, StoreError> {
    let file = std::fs::File::open(path).map_err(|e| StoreError::io(path, e))?;
    let mut out = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| StoreError::io(path, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        out.push((idx + 1, trimmed.to_string()));
    }
    Ok(out)
}
