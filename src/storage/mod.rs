mod file_storage;
mod models;

pub use file_storage::{FileStore, MemoryStore, Result, StateStore, StorageError};
pub use models::*;

/// Fixed key the state document is stored under
pub const STORAGE_KEY: &str = "quran_hifdh_web_v1";
