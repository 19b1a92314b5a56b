//! Best-effort mirroring of local progress to a remote per-user document

pub mod config;
pub mod firestore;

mod adapter;

pub use adapter::SyncAdapter;
pub use config::{SyncConfig, SyncOutcome, WriteMode, DEFAULT_FIRESTORE_URL};
pub use firestore::{FirestoreClient, RemoteDocumentStore, SyncError};
