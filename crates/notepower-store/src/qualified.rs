use std::path::Path;

use notepower_core::Creator;

use crate::atomic::{read_json, write_json_atomic};
use crate::error::StoreError;

/// Writes the accepted-creator snapshot, replacing any previous one.
///
/// # Errors
///
/// Returns [`StoreError`] on serialization or file failure.
pub fn write_qualified(path: &Path, creators: &[Creator]) -> Result<(), StoreError> {
    write_json_atomic(path, creators)
}

/// Reads the accepted-creator snapshot; a missing file is an empty list.
///
/// # Errors
///
/// Returns [`StoreError`] if the file exists but cannot be read or parsed.
pub fn read_qualified(path: &Path) -> Result<Vec<Creator>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    read_json(path)
}
