//! Persisted document models

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Chapter (surah) identifier, 1-114
pub type ChapterId = u16;

/// Verse (ayah) number within a chapter
pub type VerseNumber = u16;

/// Default difficulty assigned when marking an ayah
pub const DEFAULT_DIFFICULTY: u8 = 2;

/// Default daily goal (ayahs per day)
pub const DEFAULT_DAILY_GOAL: u32 = 10;

/// Font size choices for Arabic and translation text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
    #[serde(rename = "Extra Large")]
    ExtraLarge,
}

impl FontSize {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().replace(['-', '_'], " ").as_str() {
            "small" => Some(Self::Small),
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            "extra large" | "extralarge" => Some(Self::ExtraLarge),
            _ => None,
        }
    }
}

/// Text rendering style for Arabic verse text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    #[default]
    Uthmani,
    Indopak,
    Tajweed,
}

impl ScriptType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "uthmani" => Some(Self::Uthmani),
            "indopak" => Some(Self::Indopak),
            "tajweed" => Some(Self::Tajweed),
            _ => None,
        }
    }
}

/// User-facing settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Target number of ayahs to memorize per day
    pub daily_goal: u32,
    pub user_name: String,
    pub dark_mode: bool,
    pub show_translations: bool,
    pub arabic_font_size: FontSize,
    pub translation_font_size: FontSize,
    /// Play the next ayah's audio when the current one ends
    pub auto_play_next: bool,
    pub selected_reciter: Option<u32>,
    pub script_type: ScriptType,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daily_goal: DEFAULT_DAILY_GOAL,
            user_name: "User".to_string(),
            dark_mode: false,
            show_translations: true,
            arabic_font_size: FontSize::Medium,
            translation_font_size: FontSize::Medium,
            auto_play_next: true,
            selected_reciter: None,
            script_type: ScriptType::Uthmani,
        }
    }
}

/// Partial settings, used both for initialization overrides and for
/// multi-field updates. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub daily_goal: Option<u32>,
    pub user_name: Option<String>,
    pub dark_mode: Option<bool>,
    pub show_translations: Option<bool>,
    pub arabic_font_size: Option<FontSize>,
    pub translation_font_size: Option<FontSize>,
    pub auto_play_next: Option<bool>,
    pub selected_reciter: Option<Option<u32>>,
    pub script_type: Option<ScriptType>,
}

impl Settings {
    /// Apply every field present in the patch
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.daily_goal {
            self.daily_goal = v;
        }
        if let Some(v) = patch.user_name {
            self.user_name = v;
        }
        if let Some(v) = patch.dark_mode {
            self.dark_mode = v;
        }
        if let Some(v) = patch.show_translations {
            self.show_translations = v;
        }
        if let Some(v) = patch.arabic_font_size {
            self.arabic_font_size = v;
        }
        if let Some(v) = patch.translation_font_size {
            self.translation_font_size = v;
        }
        if let Some(v) = patch.auto_play_next {
            self.auto_play_next = v;
        }
        if let Some(v) = patch.selected_reciter {
            self.selected_reciter = v;
        }
        if let Some(v) = patch.script_type {
            self.script_type = v;
        }
    }
}

/// Memorization record for a single ayah.
///
/// Only memorized ayahs have a record; unmarking removes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AyahRecord {
    pub memorized: bool,
    /// Local calendar date the ayah was (last) marked
    pub date_memorized: NaiveDate,
    pub difficulty: u8,
}

/// Most recent mark event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LastMemorizedPosition {
    #[serde(alias = "surahId")]
    pub chapter_id: ChapterId,
    #[serde(alias = "ayahNumber")]
    pub verse_number: VerseNumber,
    pub timestamp: DateTime<Utc>,
}

/// The single persisted document holding all progress and settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub ayah_progress: BTreeMap<ChapterId, BTreeMap<VerseNumber, AyahRecord>>,
    /// Newly memorized ayahs per local date
    #[serde(default)]
    pub progress: BTreeMap<NaiveDate, u32>,
    /// Reserved for revision tracking
    #[serde(default)]
    pub revision_progress: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub last_memorized_position: Option<LastMemorizedPosition>,
    #[serde(default)]
    pub earned_achievements: BTreeSet<String>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub last_confetti_date: Option<NaiveDate>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl AppState {
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            ayah_progress: BTreeMap::new(),
            progress: BTreeMap::new(),
            revision_progress: serde_json::Map::new(),
            last_memorized_position: None,
            earned_achievements: BTreeSet::new(),
            settings,
            last_confetti_date: None,
        }
    }

    /// Look up the record for an ayah
    pub fn record(&self, chapter_id: ChapterId, verse: VerseNumber) -> Option<&AyahRecord> {
        self.ayah_progress.get(&chapter_id).and_then(|c| c.get(&verse))
    }
}
