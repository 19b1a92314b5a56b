use serde::{Deserialize, Serialize};

/// Default Firestore REST endpoint
pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";

/// Remote mirroring configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    /// Whether local changes are mirrored when a session exists
    pub enabled: bool,
    /// Firestore project holding the per-user documents
    pub project_id: String,
    pub base_url: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            project_id: "quran-memorize-cf544".to_string(),
            base_url: DEFAULT_FIRESTORE_URL.to_string(),
        }
    }
}

/// How a remote write treats fields it does not mention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Keep fields absent from the write
    Merge,
    /// Replace the whole document
    Replace,
}

/// Result of a best-effort push
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// No session, or sync disabled
    Skipped,
    Pushed,
    /// The push failed; the error was logged and dropped
    Failed(String),
}
