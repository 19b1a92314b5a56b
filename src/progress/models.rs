//! Progress statistics models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{FontSize, ScriptType, SettingsPatch, DEFAULT_DAILY_GOAL};

/// Aggregate memorization statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Ayahs currently marked memorized across all chapters
    pub total_memorized: u32,
    /// Ayahs newly marked today
    pub today_progress: u32,
    /// Consecutive active days ending today or yesterday
    pub current_streak: u32,
    pub daily_goal: u32,
}

impl Statistics {
    /// Stats reported when no document exists yet
    pub fn empty() -> Self {
        Self {
            total_memorized: 0,
            today_progress: 0,
            current_streak: 0,
            daily_goal: DEFAULT_DAILY_GOAL,
        }
    }

    /// Whether today's count has reached the daily goal
    pub fn goal_reached(&self) -> bool {
        self.daily_goal > 0 && self.today_progress >= self.daily_goal
    }
}

/// One day of the trailing weekly history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayHistory {
    /// Short weekday name ("Mon")
    pub day: String,
    pub date: NaiveDate,
    pub count: u32,
}

/// Memorization progress within one chapter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SurahProgress {
    pub memorized: u32,
    pub total: u32,
    /// Rounded percentage, 0-100
    pub percentage: u32,
}

#[derive(Error, Debug, PartialEq)]
pub enum SettingError {
    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for setting {key}")]
    InvalidValue { key: String, value: String },
}

/// Individually updatable settings, named as in the stored document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    DailyGoal,
    UserName,
    DarkMode,
    ShowTranslations,
    ArabicFontSize,
    TranslationFontSize,
    AutoPlayNext,
    SelectedReciter,
    ScriptType,
}

impl SettingKey {
    pub const ALL: [SettingKey; 9] = [
        SettingKey::DailyGoal,
        SettingKey::UserName,
        SettingKey::DarkMode,
        SettingKey::ShowTranslations,
        SettingKey::ArabicFontSize,
        SettingKey::TranslationFontSize,
        SettingKey::AutoPlayNext,
        SettingKey::SelectedReciter,
        SettingKey::ScriptType,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SettingKey::DailyGoal => "dailyGoal",
            SettingKey::UserName => "userName",
            SettingKey::DarkMode => "darkMode",
            SettingKey::ShowTranslations => "showTranslations",
            SettingKey::ArabicFontSize => "arabicFontSize",
            SettingKey::TranslationFontSize => "translationFontSize",
            SettingKey::AutoPlayNext => "autoPlayNext",
            SettingKey::SelectedReciter => "selectedReciter",
            SettingKey::ScriptType => "scriptType",
        }
    }

    /// Resolve a key by its document name (case-insensitive)
    pub fn parse(name: &str) -> Result<Self, SettingError> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| SettingError::UnknownKey(name.to_string()))
    }

    /// Build a single-field patch from a raw textual value
    pub fn patch(&self, raw: &str) -> Result<SettingsPatch, SettingError> {
        let invalid = || SettingError::InvalidValue {
            key: self.name().to_string(),
            value: raw.to_string(),
        };
        let mut patch = SettingsPatch::default();
        match self {
            SettingKey::DailyGoal => patch.daily_goal = Some(raw.parse().map_err(|_| invalid())?),
            SettingKey::UserName => patch.user_name = Some(raw.to_string()),
            SettingKey::DarkMode => patch.dark_mode = Some(parse_bool(raw).ok_or_else(invalid)?),
            SettingKey::ShowTranslations => {
                patch.show_translations = Some(parse_bool(raw).ok_or_else(invalid)?)
            }
            SettingKey::ArabicFontSize => {
                patch.arabic_font_size = Some(FontSize::parse(raw).ok_or_else(invalid)?)
            }
            SettingKey::TranslationFontSize => {
                patch.translation_font_size = Some(FontSize::parse(raw).ok_or_else(invalid)?)
            }
            SettingKey::AutoPlayNext => {
                patch.auto_play_next = Some(parse_bool(raw).ok_or_else(invalid)?)
            }
            SettingKey::SelectedReciter => {
                patch.selected_reciter = Some(match raw {
                    "" | "none" | "null" => None,
                    id => Some(id.parse().map_err(|_| invalid())?),
                })
            }
            SettingKey::ScriptType => {
                patch.script_type = Some(ScriptType::parse(raw).ok_or_else(invalid)?)
            }
        }
        Ok(patch)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}
