//! File-backed persistence: the progress checkpoint, the append-only raw
//! record store, JSONL/JSON helpers, and CSV export.

pub mod atomic;
pub mod csv;
pub mod error;
pub mod jsonl;
pub mod progress;
pub mod qualified;
pub mod records;

pub use atomic::{read_json, write_json_atomic};
pub use csv::{export_csv, to_csv_string};
pub use error::StoreError;
pub use jsonl::{read_jsonl, read_jsonl_lenient, write_jsonl};
pub use progress::{ProgressState, ProgressStore};
pub use qualified::{read_qualified, write_qualified};
pub use records::{read_records, RecordStore};
