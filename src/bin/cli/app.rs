use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use hifdh_lib::auth::Session;
use hifdh_lib::content::QuranClient;
use hifdh_lib::progress::ProgressEngine;
use hifdh_lib::storage::{AppState, FileStore, Settings};
use hifdh_lib::sync::{FirestoreClient, SyncAdapter, SyncOutcome};
use hifdh_lib::AppConfig;

/// Shared application state for CLI commands
pub struct App {
    pub config: AppConfig,
    pub config_path: PathBuf,
    pub engine: ProgressEngine<FileStore>,
    pub sync: SyncAdapter,
}

impl App {
    /// Load configuration and open the local state store
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => AppConfig::default_path().context("Failed to locate config directory")?,
        };
        let config = AppConfig::load(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        let data_dir = config.data_dir().context("Failed to get data directory")?;
        let store = FileStore::new(data_dir);
        store.init().context("Failed to initialize storage")?;

        let sync = sync_adapter(&config, config.sync_session())?;

        Ok(Self {
            config,
            config_path,
            engine: ProgressEngine::new(store),
            sync,
        })
    }

    /// Client for the remote content API
    pub fn content(&self) -> Result<QuranClient> {
        Ok(QuranClient::new(&self.config.content.base_url)
            .context("Invalid content API URL")?
            .with_per_page(self.config.content.per_page))
    }

    /// Mirror progress after a mutation. Failures are only logged.
    pub async fn sync_progress(&self, state: AppState) {
        if !self.sync.is_active() {
            return;
        }
        report(self.sync.spawn_progress(state).await);
    }

    /// Mirror settings after a mutation. Failures are only logged.
    pub async fn sync_settings(&self, settings: Settings) {
        if !self.sync.is_active() {
            return;
        }
        report(self.sync.spawn_settings(settings).await);
    }
}

/// Adapter pushing as `session`, or a disabled one without a session
pub fn sync_adapter(config: &AppConfig, session: Option<Session>) -> Result<SyncAdapter> {
    match session {
        Some(session) if config.sync.enabled => {
            let remote = FirestoreClient::new(&config.sync.base_url, &config.sync.project_id)
                .context("Failed to create sync client")?;
            Ok(SyncAdapter::new(Arc::new(remote), Some(session)))
        }
        _ => Ok(SyncAdapter::disabled()),
    }
}

fn report(result: std::result::Result<SyncOutcome, tokio::task::JoinError>) {
    match result {
        Ok(outcome) => log::debug!("Sync outcome: {:?}", outcome),
        Err(e) => log::warn!("Sync task did not complete: {}", e),
    }
}
