#![forbid(unsafe_code)]

pub mod records;
pub mod repository;
pub mod sqlite;

pub use records::{LocalRecords, StoredUsers};
pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError};
pub use sqlite::{SqliteInitError, SqliteStore};
