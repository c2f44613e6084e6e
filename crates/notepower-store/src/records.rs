//! Append-only raw record store: one JSON article record per line.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use notepower_core::ArticleRecord;

use crate::atomic::ensure_parent;
use crate::error::StoreError;
use crate::jsonl::read_jsonl_lenient;

/// Handle on the raw record store.
///
/// Every accepted record is written as one complete line and flushed before
/// [`RecordStore::append`] returns. Dedup keys of every line already on disk
/// are loaded at open so articles are never stored twice across runs.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    file: File,
    seen: HashSet<String>,
    len: usize,
}

impl RecordStore {
    /// Opens (creating if needed) the store at `path`.
    ///
    /// A torn final line left by a run cut off mid-write is cut from the
    /// file, so every line on disk stays a complete record. A final line
    /// that parses but lost only its newline is kept and terminated.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read or opened.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        ensure_parent(&path)?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .map_err(|e| StoreError::io(&path, e))?;
        let dropped = repair_tail(&mut file).map_err(|e| StoreError::io(&path, e))?;
        if dropped > 0 {
            tracing::warn!(
                path = %path.display(),
                bytes = dropped,
                "dropped torn final line from record store"
            );
        }

        let existing = read_jsonl_lenient::<ArticleRecord>(&path)?;
        let seen: HashSet<String> = existing
            .iter()
            .map(|r| r.dedup_key().to_string())
            .collect();

        tracing::debug!(
            path = %path.display(),
            records = existing.len(),
            "record store opened"
        );

        Ok(Self {
            path,
            file,
            seen,
            len: existing.len(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of valid records in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether a record with this dedup key has already been stored.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    /// Appends `record` unless its dedup key is already present.
    ///
    /// Returns `true` if the record was written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the write fails.
    pub fn append(&mut self, record: &ArticleRecord) -> Result<bool, StoreError> {
        let key = record.dedup_key();
        if self.seen.contains(key) {
            return Ok(false);
        }

        let mut line =
            serde_json::to_string(record).map_err(|e| StoreError::serialize(&self.path, e))?;
        line.push('\n');
        self.file
            .write_all(line.as_bytes())
            .and_then(|()| self.file.flush())
            .map_err(|e| StoreError::io(&self.path, e))?;

        self.seen.insert(key.to_string());
        self.len += 1;
        Ok(true)
    }
}

/// Reads every valid record from the store at `path`, skipping unparseable
/// lines with a warning.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read.
pub fn read_records(path: &Path) -> Result<Vec<ArticleRecord>, StoreError> {
    read_jsonl_lenient(path)
}

const TAIL_CHUNK: u64 = 4096;

/// Makes the file end on a line boundary. Returns the number of bytes cut.
fn repair_tail(file: &mut File) -> std::io::Result<u64> {
    let len = file.metadata()?.len();
    let keep = last_line_end(file, len)?;
    if keep == len {
        return Ok(0);
    }

    let mut fragment = Vec::new();
    file.seek(SeekFrom::Start(keep))?;
    file.read_to_end(&mut fragment)?;
    if serde_json::from_slice::<ArticleRecord>(&fragment).is_ok() {
        file.write_all(b"\n")?;
        return Ok(0);
    }

    file.set_len(keep)?;
    Ok(len - keep)
}

/// Offset just past the last `\n` in the first `len` bytes, or `0`.
fn last_line_end(file: &mut File, len: u64) -> std::io::Result<u64> {
    let mut end = len;
    while end > 0 {
        let start = end.saturating_sub(TAIL_CHUNK);
        let size = usize::try_from(end - start).map_err(std::io::Error::other)?;
        let mut chunk = vec![0u8; size];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(&mut chunk)?;
        if let Some(pos) = chunk.iter().rposition(|&b| b == b'\n') {
            return Ok(start + pos as u64 + 1);
        }
        end = start;
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notepower_core::Scores;

    fn record(key: &str, title: &str) -> ArticleRecord {
        ArticleRecord {
            note_id: format!("id-{key}"),
            key: key.to_string(),
            title: title.to_string(),
            body_preview: String::new(),
            user_id: "taro".to_string(),
            user_nickname: "太郎".to_string(),
            follower_count: 100,
            like_count: 120,
            comment_count: 2,
            price: 0,
            is_paid: false,
            published_at: String::new(),
            url: String::new(),
            category: "career".to_string(),
            keyword: "副業".to_string(),
            scores: Scores {
                power_score: 1.2,
                engagement_rate: 1.26,
                virality_score: 131.5,
            },
        }
    }

    #[test]
    fn append_writes_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw_notes.jsonl");
        let mut store = RecordStore::open(&path).unwrap();
        assert!(store.append(&record("n1", "一つ目")).unwrap());
        assert!(store.append(&record("n2", "二つ目")).unwrap());

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.ends_with('\n'));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn duplicate_key_is_skipped_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw_notes.jsonl");
        {
            let mut store = RecordStore::open(&path).unwrap();
            store.append(&record("n1", "a")).unwrap();
        }
        let mut store = RecordStore::open(&path).unwrap();
        assert!(store.contains("n1"));
        assert!(!store.append(&record("n1", "a again")).unwrap());
        assert_eq!(read_records(&path).unwrap().len(), 1);
    }

    fn assert_every_line_parses(path: &Path) {
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.is_empty() || content.ends_with('\n'));
        for (i, line) in content.lines().enumerate() {
            assert!(
                serde_json::from_str::<ArticleRecord>(line).is_ok(),
                "line {i} does not parse: {line}"
            );
        }
    }

    #[test]
    fn torn_tail_is_cut_on_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw_notes.jsonl");
        let good = serde_json::to_string(&record("n1", "ok")).unwrap();
        std::fs::write(&path, format!("{good}\n{{\"note_id\":\"2\",\"ke")).unwrap();

        let mut store = RecordStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            format!("{good}\n")
        );
        store.append(&record("n3", "after crash")).unwrap();
        drop(store);

        assert_every_line_parses(&path);
        let keys: Vec<String> = read_records(&path)
            .unwrap()
            .into_iter()
            .map(|r| r.key)
            .collect();
        assert_eq!(keys, vec!["n1", "n3"]);
    }

    #[test]
    fn torn_only_line_leaves_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw_notes.jsonl");
        std::fs::write(&path, "{\"note_id\":\"1\"").unwrap();

        let store = RecordStore::open(&path).unwrap();
        assert!(store.is_empty());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn complete_record_missing_newline_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw_notes.jsonl");
        let first = serde_json::to_string(&record("n1", "一")).unwrap();
        let second = serde_json::to_string(&record("n2", "二")).unwrap();
        std::fs::write(&path, format!("{first}\n{second}")).unwrap();

        let mut store = RecordStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.append(&record("n3", "三")).unwrap());
        drop(store);

        assert_every_line_parses(&path);
        assert_eq!(read_records(&path).unwrap().len(), 3);
    }

    #[test]
    fn long_torn_tail_spanning_chunks_is_cut() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw_notes.jsonl");
        let good = serde_json::to_string(&record("n1", "ok")).unwrap();
        let torn = format!("{{\"note_id\":\"2\",\"title\":\"{}", "あ".repeat(3000));
        std::fs::write(&path, format!("{good}\n{torn}")).unwrap();

        let store = RecordStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
        drop(store);
        assert_every_line_parses(&path);
    }

    #[test]
    fn every_line_parses_independently() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw_notes.jsonl");
        let mut store = RecordStore::open(&path).unwrap();
        for i in 0..5 {
            store
                .append(&record(&format!("n{i}"), &format!("タイトル{i}")))
                .unwrap();
        }
        drop(store);

        for line in std::fs::read_to_string(&path).unwrap().lines() {
            serde_json::from_str::<ArticleRecord>(line).expect("line should parse");
        }
    }
}
