//! Progress engine over the persisted state document

use chrono::{DateTime, Local, Utc};

use super::models::{DayHistory, Statistics, SurahProgress};
use super::stats;
use crate::storage::{
    AppState, AyahRecord, ChapterId, LastMemorizedPosition, Result, Settings, SettingsPatch,
    StateStore, StorageError, VerseNumber, STORAGE_KEY,
};

/// Marks, unmarks and summarizes memorization progress.
///
/// Every mutation reads the full document, changes it and writes it back
/// whole. Callers must not run two mutations against the same store
/// concurrently.
pub struct ProgressEngine<S: StateStore> {
    store: S,
}

impl<S: StateStore> ProgressEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ===== Document access =====

    /// Load the stored document, if any
    pub fn load(&self) -> Result<Option<AppState>> {
        let raw = logged("read state", self.store.get(STORAGE_KEY))?;
        match raw {
            Some(json) => {
                let state = serde_json::from_str(&json).map_err(StorageError::from);
                logged("parse state", state).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Replace the stored document
    pub fn save(&self, state: &AppState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        logged("write state", self.store.set(STORAGE_KEY, &json))
    }

    /// Create and persist a fresh document with defaults plus `overrides`
    pub fn initialize(&self, overrides: SettingsPatch) -> Result<AppState> {
        let mut settings = Settings::default();
        settings.apply(overrides);
        let state = AppState::with_settings(settings);
        self.save(&state)?;
        log::info!("Initialized progress document");
        Ok(state)
    }

    /// Load the document, creating it with default settings when absent
    pub fn load_or_initialize(&self) -> Result<AppState> {
        match self.load()? {
            Some(state) => Ok(state),
            None => self.initialize(SettingsPatch::default()),
        }
    }

    /// Delete the document entirely
    pub fn reset(&self) -> Result<()> {
        logged("clear state", self.store.remove(STORAGE_KEY))?;
        log::info!("Cleared progress document");
        Ok(())
    }

    // ===== Memorization =====

    /// Mark an ayah memorized today
    pub fn mark_memorized(
        &self,
        chapter_id: ChapterId,
        verse: VerseNumber,
        difficulty: u8,
    ) -> Result<AppState> {
        self.mark_memorized_at(chapter_id, verse, difficulty, Local::now())
    }

    /// Mark an ayah memorized as of `now`.
    ///
    /// Overwrites any existing record and always adds one to the day's
    /// counter, even when the ayah was already memorized.
    pub fn mark_memorized_at(
        &self,
        chapter_id: ChapterId,
        verse: VerseNumber,
        difficulty: u8,
        now: DateTime<Local>,
    ) -> Result<AppState> {
        let mut state = self.load_or_initialize()?;
        let today = now.date_naive();

        state.ayah_progress.entry(chapter_id).or_default().insert(
            verse,
            AyahRecord {
                memorized: true,
                date_memorized: today,
                difficulty,
            },
        );

        *state.progress.entry(today).or_insert(0) += 1;

        state.last_memorized_position = Some(LastMemorizedPosition {
            chapter_id,
            verse_number: verse,
            timestamp: now.with_timezone(&Utc),
        });

        self.save(&state)?;
        log::info!("Marked {}:{} memorized", chapter_id, verse);
        Ok(state)
    }

    /// Remove an ayah's record and take it back off the day it was counted.
    ///
    /// Leaves the store untouched when no record exists. The last memorized
    /// position is not rolled back.
    pub fn unmark_memorized(&self, chapter_id: ChapterId, verse: VerseNumber) -> Result<AppState> {
        let mut state = self.load_or_initialize()?;

        let removed = state
            .ayah_progress
            .get_mut(&chapter_id)
            .and_then(|chapter| chapter.remove(&verse));

        let Some(record) = removed else {
            return Ok(state);
        };

        if let Some(count) = state.progress.get_mut(&record.date_memorized) {
            *count = count.saturating_sub(1);
        }

        self.save(&state)?;
        log::info!("Unmarked {}:{}", chapter_id, verse);
        Ok(state)
    }

    /// Flip an ayah's memorized state, returning the new state
    pub fn toggle_memorized(&self, chapter_id: ChapterId, verse: VerseNumber) -> Result<bool> {
        self.toggle_memorized_at(chapter_id, verse, Local::now())
    }

    pub fn toggle_memorized_at(
        &self,
        chapter_id: ChapterId,
        verse: VerseNumber,
        now: DateTime<Local>,
    ) -> Result<bool> {
        if self.is_memorized(chapter_id, verse)? {
            self.unmark_memorized(chapter_id, verse)?;
            Ok(false)
        } else {
            self.mark_memorized_at(chapter_id, verse, crate::storage::DEFAULT_DIFFICULTY, now)?;
            Ok(true)
        }
    }

    pub fn is_memorized(&self, chapter_id: ChapterId, verse: VerseNumber) -> Result<bool> {
        Ok(self
            .load()?
            .and_then(|state| state.record(chapter_id, verse).map(|r| r.memorized))
            .unwrap_or(false))
    }

    // ===== Statistics =====

    pub fn statistics(&self) -> Result<Statistics> {
        self.statistics_at(Local::now())
    }

    pub fn statistics_at(&self, now: DateTime<Local>) -> Result<Statistics> {
        Ok(match self.load()? {
            Some(state) => stats::statistics(&state, now.date_naive()),
            None => Statistics::empty(),
        })
    }

    pub fn weekly_history(&self) -> Result<Vec<DayHistory>> {
        self.weekly_history_at(Local::now())
    }

    pub fn weekly_history_at(&self, now: DateTime<Local>) -> Result<Vec<DayHistory>> {
        let state = self.load()?.unwrap_or_default();
        Ok(stats::weekly_history(&state.progress, now.date_naive()))
    }

    pub fn surah_progress(&self, chapter_id: ChapterId, total: u32) -> Result<SurahProgress> {
        let state = self.load()?.unwrap_or_default();
        Ok(stats::surah_progress(&state, chapter_id, total))
    }

    // ===== Settings =====

    /// Current settings, or defaults when no document exists
    pub fn settings(&self) -> Result<Settings> {
        Ok(self.load()?.map(|s| s.settings).unwrap_or_default())
    }

    /// Apply a partial settings update
    pub fn update_settings(&self, patch: SettingsPatch) -> Result<AppState> {
        let mut state = self.load_or_initialize()?;
        state.settings.apply(patch);
        self.save(&state)?;
        log::info!("Updated settings");
        Ok(state)
    }
}

fn logged<T>(operation: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        log::error!("Failed to {}: {}", operation, e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use chrono::{Duration, NaiveDate, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_end_to_end_mark_then_unmark() {
        let engine = ProgressEngine::new(MemoryStore::new());
        let now = at(2024, 6, 1);

        let state = engine.mark_memorized_at(2, 5, 2, now).unwrap();
        assert!(engine.is_memorized(2, 5).unwrap());
        assert_eq!(state.progress[&date(2024, 6, 1)], 1);
        let position = state.last_memorized_position.clone().unwrap();
        assert_eq!((position.chapter_id, position.verse_number), (2, 5));

        let state = engine.unmark_memorized(2, 5).unwrap();
        assert!(!engine.is_memorized(2, 5).unwrap());
        assert_eq!(state.progress[&date(2024, 6, 1)], 0);
        assert!(state.record(2, 5).is_none());
        // Position is not rolled back
        assert_eq!(state.last_memorized_position, Some(position));
    }

    #[test]
    fn test_unmark_absent_leaves_document_unchanged() {
        let engine = ProgressEngine::new(MemoryStore::new());
        engine.mark_memorized_at(1, 1, 2, at(2024, 6, 1)).unwrap();
        let before = engine.store().get(STORAGE_KEY).unwrap().unwrap();

        engine.unmark_memorized(1, 2).unwrap();
        engine.unmark_memorized(3, 1).unwrap();

        let after = engine.store().get(STORAGE_KEY).unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remark_same_day_counts_twice() {
        let engine = ProgressEngine::new(MemoryStore::new());
        let now = at(2024, 6, 1);

        engine.mark_memorized_at(1, 1, 2, now).unwrap();
        let state = engine.mark_memorized_at(1, 1, 3, now).unwrap();

        assert_eq!(state.progress[&date(2024, 6, 1)], 2);
        assert_eq!(state.ayah_progress[&1].len(), 1);
        assert_eq!(state.record(1, 1).unwrap().difficulty, 3);
    }

    #[test]
    fn test_remark_on_later_day_keeps_original_day_count() {
        let engine = ProgressEngine::new(MemoryStore::new());
        engine.mark_memorized_at(1, 1, 2, at(2024, 6, 1)).unwrap();
        let state = engine.mark_memorized_at(1, 1, 2, at(2024, 6, 3)).unwrap();

        assert_eq!(state.progress[&date(2024, 6, 1)], 1);
        assert_eq!(state.progress[&date(2024, 6, 3)], 1);
        assert_eq!(state.record(1, 1).unwrap().date_memorized, date(2024, 6, 3));

        // Unmark decrements the day of the most recent mark only
        let state = engine.unmark_memorized(1, 1).unwrap();
        assert_eq!(state.progress[&date(2024, 6, 1)], 1);
        assert_eq!(state.progress[&date(2024, 6, 3)], 0);
    }

    #[test]
    fn test_progress_never_negative() {
        let engine = ProgressEngine::new(MemoryStore::new());
        let now = at(2024, 6, 1);

        engine.mark_memorized_at(1, 1, 2, now).unwrap();
        engine.mark_memorized_at(1, 2, 2, now).unwrap();

        // Simulate a counter that was already lowered elsewhere
        let mut state = engine.load().unwrap().unwrap();
        state.progress.insert(date(2024, 6, 1), 1);
        engine.save(&state).unwrap();

        engine.unmark_memorized(1, 1).unwrap();
        let state = engine.unmark_memorized(1, 2).unwrap();
        assert_eq!(state.progress[&date(2024, 6, 1)], 0);
        assert!(state.progress.values().all(|&c| c == 0));
    }

    #[test]
    fn test_unmark_does_not_create_missing_day_entry() {
        let engine = ProgressEngine::new(MemoryStore::new());
        engine.mark_memorized_at(4, 1, 2, at(2024, 6, 1)).unwrap();

        let mut state = engine.load().unwrap().unwrap();
        state.progress.clear();
        engine.save(&state).unwrap();

        let state = engine.unmark_memorized(4, 1).unwrap();
        assert!(state.progress.is_empty());
    }

    #[test]
    fn test_statistics() {
        let engine = ProgressEngine::new(MemoryStore::new());
        assert_eq!(engine.statistics_at(at(2024, 6, 3)).unwrap(), Statistics::empty());

        engine.mark_memorized_at(1, 1, 2, at(2024, 6, 1)).unwrap();
        engine.mark_memorized_at(1, 2, 2, at(2024, 6, 2)).unwrap();
        engine.mark_memorized_at(2, 1, 2, at(2024, 6, 3)).unwrap();
        engine.mark_memorized_at(2, 2, 2, at(2024, 6, 3)).unwrap();

        let stats = engine.statistics_at(at(2024, 6, 3)).unwrap();
        assert_eq!(stats.total_memorized, 4);
        assert_eq!(stats.today_progress, 2);
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.daily_goal, 10);
    }

    #[test]
    fn test_statistics_does_not_create_document() {
        let engine = ProgressEngine::new(MemoryStore::new());
        engine.statistics().unwrap();
        engine.weekly_history().unwrap();
        assert!(!engine.is_memorized(1, 1).unwrap());
        assert!(engine.load().unwrap().is_none());
    }

    #[test]
    fn test_weekly_history_last_entry_is_today() {
        let engine = ProgressEngine::new(MemoryStore::new());
        let now = at(2024, 6, 10);
        engine.mark_memorized_at(1, 1, 2, now - Duration::days(2)).unwrap();

        let history = engine.weekly_history_at(now).unwrap();
        assert_eq!(history.len(), 7);
        assert_eq!(history[6].date, date(2024, 6, 10));
        assert_eq!(history[4].count, 1);
    }

    #[test]
    fn test_toggle() {
        let engine = ProgressEngine::new(MemoryStore::new());
        let now = at(2024, 6, 1);
        assert!(engine.toggle_memorized_at(3, 4, now).unwrap());
        assert_eq!(
            engine.load().unwrap().unwrap().record(3, 4).unwrap().difficulty,
            crate::storage::DEFAULT_DIFFICULTY
        );
        assert!(!engine.toggle_memorized_at(3, 4, now).unwrap());
        assert!(!engine.is_memorized(3, 4).unwrap());
    }

    #[test]
    fn test_settings_update_and_initialize_overrides() {
        let engine = ProgressEngine::new(MemoryStore::new());
        assert_eq!(engine.settings().unwrap(), Settings::default());

        let state = engine
            .initialize(SettingsPatch {
                user_name: Some("Amina".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(state.settings.user_name, "Amina");

        engine
            .update_settings(SettingsPatch {
                daily_goal: Some(3),
                dark_mode: Some(true),
                ..Default::default()
            })
            .unwrap();

        let settings = engine.settings().unwrap();
        assert_eq!(settings.daily_goal, 3);
        assert!(settings.dark_mode);
        assert_eq!(settings.user_name, "Amina");
        assert_eq!(engine.statistics().unwrap().daily_goal, 3);
    }

    #[test]
    fn test_reset_removes_document() {
        let engine = ProgressEngine::new(MemoryStore::new());
        engine.mark_memorized_at(1, 1, 2, at(2024, 6, 1)).unwrap();
        engine.reset().unwrap();
        assert!(engine.load().unwrap().is_none());
        assert!(!engine.is_memorized(1, 1).unwrap());
    }

    #[test]
    fn test_surah_progress() {
        let engine = ProgressEngine::new(MemoryStore::new());
        for verse in 1..=3 {
            engine.mark_memorized_at(1, verse, 2, at(2024, 6, 1)).unwrap();
        }
        let progress = engine.surah_progress(1, 7).unwrap();
        assert_eq!(progress.memorized, 3);
        assert_eq!(progress.percentage, 43);
    }

    #[test]
    fn test_file_backed_document_persists_across_engines() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());

        ProgressEngine::new(&store)
            .mark_memorized_at(114, 6, 1, at(2024, 6, 1))
            .unwrap();

        let engine = ProgressEngine::new(&store);
        assert!(engine.is_memorized(114, 6).unwrap());

        let raw = std::fs::read_to_string(dir.path().join(format!("{}.json", STORAGE_KEY))).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["ayahProgress"]["114"]["6"]["memorized"], true);
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();
        let engine = ProgressEngine::new(store);
        assert!(matches!(engine.load(), Err(StorageError::Json(_))));
        assert!(engine.mark_memorized(1, 1, 2).is_err());
    }
}
