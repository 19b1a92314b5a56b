use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use tokio::task::JoinHandle;

use super::config::{SyncOutcome, WriteMode};
use super::firestore::{RemoteDocumentStore, SyncError};
use crate::auth::Session;
use crate::storage::{AppState, Settings, DEFAULT_DAILY_GOAL};

/// Mirrors local changes to the signed-in user's remote documents.
///
/// Pushes are best effort: failures are logged and reported as
/// [`SyncOutcome::Failed`], never retried and never reconciled with remote
/// changes. The last write wins.
#[derive(Clone)]
pub struct SyncAdapter {
    remote: Option<Arc<dyn RemoteDocumentStore>>,
    session: Option<Session>,
}

impl SyncAdapter {
    pub fn new(remote: Arc<dyn RemoteDocumentStore>, session: Option<Session>) -> Self {
        Self {
            remote: Some(remote),
            session,
        }
    }

    /// An adapter that skips every push
    pub fn disabled() -> Self {
        Self {
            remote: None,
            session: None,
        }
    }

    /// Whether pushes will be attempted
    pub fn is_active(&self) -> bool {
        self.remote.is_some() && self.session.is_some()
    }

    fn user_path(session: &Session) -> String {
        format!("users/{}", session.uid)
    }

    fn progress_path(session: &Session) -> String {
        format!("users/{}/progress/data", session.uid)
    }

    async fn push(
        &self,
        label: &str,
        path_for: fn(&Session) -> String,
        fields: Map<String, Value>,
        mode: WriteMode,
    ) -> SyncOutcome {
        let (Some(remote), Some(session)) = (&self.remote, &self.session) else {
            log::debug!("Sync: skipping {} push (no session)", label);
            return SyncOutcome::Skipped;
        };

        match remote.write(session, &path_for(session), fields, mode).await {
            Ok(()) => {
                log::info!("Sync: pushed {} for user {}", label, session.uid);
                SyncOutcome::Pushed
            }
            Err(e) => {
                log::warn!("Sync: {} push failed: {}", label, e);
                SyncOutcome::Failed(e.to_string())
            }
        }
    }

    /// Merge-write the settings slice to `users/{uid}`
    pub async fn push_settings(&self, settings: &Settings) -> SyncOutcome {
        let fields = match settings_slice(settings) {
            Ok(fields) => fields,
            Err(e) => return failed("settings", e),
        };
        self.push("settings", Self::user_path, fields, WriteMode::Merge)
            .await
    }

    /// Merge-write the progress slice to `users/{uid}/progress/data`
    pub async fn push_progress(&self, state: &AppState) -> SyncOutcome {
        let fields = match progress_slice(state) {
            Ok(fields) => fields,
            Err(e) => return failed("progress", e),
        };
        self.push("progress", Self::progress_path, fields, WriteMode::Merge)
            .await
    }

    /// Create the user document for a new account
    pub async fn seed_account(&self, email: &str, display_name: &str) -> SyncOutcome {
        let mut fields = Map::new();
        fields.insert("email".to_string(), json!(email));
        fields.insert("displayName".to_string(), json!(display_name));
        fields.insert("createdAt".to_string(), json!(timestamp()));
        fields.insert(
            "settings".to_string(),
            json!({ "darkMode": false, "dailyGoal": DEFAULT_DAILY_GOAL }),
        );
        self.push("account", Self::user_path, fields, WriteMode::Replace)
            .await
    }

    /// Push settings without waiting on the result
    pub fn spawn_settings(&self, settings: Settings) -> JoinHandle<SyncOutcome> {
        let adapter = self.clone();
        tokio::spawn(async move { adapter.push_settings(&settings).await })
    }

    /// Push progress without waiting on the result
    pub fn spawn_progress(&self, state: AppState) -> JoinHandle<SyncOutcome> {
        let adapter = self.clone();
        tokio::spawn(async move { adapter.push_progress(&state).await })
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn settings_slice(settings: &Settings) -> Result<Map<String, Value>, SyncError> {
    let mut fields = Map::new();
    fields.insert("settings".to_string(), serde_json::to_value(settings)?);
    fields.insert("lastUpdated".to_string(), json!(timestamp()));
    Ok(fields)
}

fn progress_slice(state: &AppState) -> Result<Map<String, Value>, SyncError> {
    let mut fields = Map::new();
    fields.insert("ayahProgress".to_string(), serde_json::to_value(&state.ayah_progress)?);
    fields.insert("progress".to_string(), serde_json::to_value(&state.progress)?);
    fields.insert(
        "lastMemorizedPosition".to_string(),
        serde_json::to_value(&state.last_memorized_position)?,
    );
    fields.insert("lastUpdated".to_string(), json!(timestamp()));
    Ok(fields)
}

fn failed(label: &str, e: SyncError) -> SyncOutcome {
    log::warn!("Sync: {} push failed: {}", label, e);
    SyncOutcome::Failed(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    use crate::storage::AyahRecord;

    #[derive(Default)]
    struct RecordingStore {
        writes: Mutex<Vec<(String, Map<String, Value>, WriteMode)>>,
    }

    #[async_trait]
    impl RemoteDocumentStore for RecordingStore {
        async fn write(
            &self,
            _session: &Session,
            path: &str,
            fields: Map<String, Value>,
            mode: WriteMode,
        ) -> Result<(), SyncError> {
            self.writes
                .lock()
                .unwrap()
                .push((path.to_string(), fields, mode));
            Ok(())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl RemoteDocumentStore for FailingStore {
        async fn write(
            &self,
            _session: &Session,
            _path: &str,
            _fields: Map<String, Value>,
            _mode: WriteMode,
        ) -> Result<(), SyncError> {
            Err(SyncError::Server {
                status: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    fn session() -> Session {
        Session {
            uid: "abc".to_string(),
            id_token: "t".to_string(),
            email: Some("a@b.c".to_string()),
        }
    }

    #[tokio::test]
    async fn test_skips_without_session() {
        let store = Arc::new(RecordingStore::default());
        let adapter = SyncAdapter::new(store.clone(), None);

        assert!(!adapter.is_active());
        assert_eq!(adapter.push_settings(&Settings::default()).await, SyncOutcome::Skipped);
        assert!(store.writes.lock().unwrap().is_empty());

        let disabled = SyncAdapter::disabled();
        assert_eq!(disabled.push_progress(&AppState::default()).await, SyncOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_progress_slice() {
        let store = Arc::new(RecordingStore::default());
        let adapter = SyncAdapter::new(store.clone(), Some(session()));

        let mut state = AppState::default();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        state.ayah_progress.entry(2).or_default().insert(
            5,
            AyahRecord {
                memorized: true,
                date_memorized: date,
                difficulty: 2,
            },
        );
        state.progress.insert(date, 1);

        let outcome = adapter.spawn_progress(state).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Pushed);

        let writes = store.writes.lock().unwrap();
        let (path, fields, mode) = &writes[0];
        assert_eq!(path, "users/abc/progress/data");
        assert_eq!(*mode, WriteMode::Merge);
        assert_eq!(fields["ayahProgress"]["2"]["5"]["memorized"], true);
        assert_eq!(fields["progress"]["2024-06-01"], 1);
        assert!(fields["lastMemorizedPosition"].is_null());
        assert!(fields.contains_key("lastUpdated"));
        assert!(!fields.contains_key("settings"));
    }

    #[tokio::test]
    async fn test_settings_slice_and_account_seed() {
        let store = Arc::new(RecordingStore::default());
        let adapter = SyncAdapter::new(store.clone(), Some(session()));

        adapter.push_settings(&Settings::default()).await;
        adapter.seed_account("a@b.c", "Amina").await;

        let writes = store.writes.lock().unwrap();
        assert_eq!(writes[0].0, "users/abc");
        assert_eq!(writes[0].1["settings"]["userName"], "User");
        assert_eq!(writes[0].2, WriteMode::Merge);

        assert_eq!(writes[1].0, "users/abc");
        assert_eq!(writes[1].1["displayName"], "Amina");
        assert_eq!(writes[1].1["settings"]["dailyGoal"], 10);
        assert_eq!(writes[1].2, WriteMode::Replace);
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let adapter = SyncAdapter::new(Arc::new(FailingStore), Some(session()));
        match adapter.push_settings(&Settings::default()).await {
            SyncOutcome::Failed(message) => assert!(message.contains("503")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
