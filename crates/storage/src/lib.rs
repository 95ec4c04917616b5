#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;
pub mod store;

pub use repository::{InMemoryProgressRepository, ProgressRecord, ProgressRepository, StorageError};
pub use sqlite::{SqliteInitError, SqliteRepository};
pub use store::ProgressStore;
