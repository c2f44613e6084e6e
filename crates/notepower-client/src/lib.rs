pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use client::NoteClient;
pub use error::{ClientError, FailureKind};
pub use retry::RetryPolicy;
pub use types::{ContentsPage, CreatorProfile, NoteContent, NoteUser};
