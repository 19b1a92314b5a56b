//! Chapter, verse and reciter models for the remote content API

use serde::{Deserialize, Serialize};

use crate::storage::ScriptType;

/// Text format understood by the content API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Uthmani,
    Imlaei,
    Tajweed,
}

impl TextFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextFormat::Uthmani => "uthmani",
            TextFormat::Imlaei => "imlaei",
            TextFormat::Tajweed => "tajweed",
        }
    }
}

impl From<ScriptType> for TextFormat {
    fn from(script: ScriptType) -> Self {
        match script {
            ScriptType::Uthmani => TextFormat::Uthmani,
            ScriptType::Indopak => TextFormat::Imlaei,
            ScriptType::Tajweed => TextFormat::Tajweed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslatedName {
    pub name: String,
    #[serde(default)]
    pub language_name: Option<String>,
}

/// Chapter (surah) metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chapter {
    pub id: u16,
    pub name_arabic: String,
    pub name_simple: String,
    #[serde(default)]
    pub name_complex: Option<String>,
    pub revelation_place: String,
    pub verses_count: u32,
    #[serde(default)]
    pub pages: Vec<u32>,
    #[serde(default)]
    pub translated_name: Option<TranslatedName>,
}

impl Chapter {
    /// Search match on number, transliterated name or Arabic name.
    ///
    /// The number matches as a substring, so "11" finds 11 and 110 to 114.
    /// A blank query matches every chapter.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.id.to_string().contains(&query)
            || self.name_simple.to_lowercase().contains(&query)
            || self.name_arabic.contains(&query)
    }
}

/// Chapter header returned alongside its verses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurahInfo {
    pub id: u16,
    pub name_arabic: String,
    pub name_simple: String,
    pub revelation_place: String,
    pub verses_count: u32,
    pub has_bismillah: bool,
}

/// A verse with translation and optional recitation audio
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Verse {
    pub id: Option<u32>,
    /// "chapter:verse"
    pub key: String,
    pub number: u16,
    pub text: String,
    /// Translation as HTML, empty when unavailable
    pub translation: String,
    pub audio_url: Option<String>,
    pub page_number: Option<u32>,
    pub juz_number: Option<u32>,
    pub hizb_number: Option<u32>,
}

/// A chapter with all its verses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurahWithVerses {
    pub surah: SurahInfo,
    pub bismillah: Option<serde_json::Value>,
    pub ayahs: Vec<Verse>,
    pub metadata: Option<serde_json::Value>,
}

/// An audio narration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reciter {
    pub id: u32,
    #[serde(alias = "reciter_name")]
    pub name: String,
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageInfo {
    pub number: u32,
    pub total_pages: Option<u32>,
    pub juz_number: Option<u32>,
    pub hizb_number: Option<u32>,
}

/// One mushaf page and the verses on it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageData {
    pub page: PageInfo,
    pub verses: Vec<Verse>,
}

// ===== Wire formats =====

#[derive(Debug, Deserialize)]
pub(crate) struct ChaptersResponse {
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecitersResponse {
    #[serde(default)]
    pub reciters: Vec<Reciter>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawChapterInfo {
    pub id: u16,
    #[serde(default)]
    pub name_arabic: String,
    #[serde(default)]
    pub name_simple: String,
    #[serde(default)]
    pub revelation_place: String,
    pub verses_count: Option<u32>,
    pub total_ayahs: Option<u32>,
    pub bismillah_pre: Option<bool>,
    pub has_bismillah: Option<bool>,
}

impl From<RawChapterInfo> for SurahInfo {
    fn from(raw: RawChapterInfo) -> Self {
        Self {
            id: raw.id,
            name_arabic: raw.name_arabic,
            name_simple: raw.name_simple,
            revelation_place: raw.revelation_place,
            verses_count: raw
                .verses_count
                .filter(|&n| n > 0)
                .or(raw.total_ayahs)
                .unwrap_or(0),
            has_bismillah: raw.bismillah_pre.unwrap_or(false)
                || raw.has_bismillah.unwrap_or(false),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawVerse {
    pub id: Option<u32>,
    pub key: String,
    pub number: u16,
    #[serde(default)]
    pub text: String,
    pub translation_html: Option<String>,
    pub audio_url: Option<String>,
    #[serde(alias = "page_number")]
    pub page_number: Option<u32>,
    #[serde(alias = "juz_number")]
    pub juz_number: Option<u32>,
    #[serde(alias = "hizb_number")]
    pub hizb_number: Option<u32>,
}

impl From<RawVerse> for Verse {
    fn from(raw: RawVerse) -> Self {
        Self {
            id: raw.id,
            key: raw.key,
            number: raw.number,
            text: raw.text,
            translation: raw.translation_html.unwrap_or_default(),
            audio_url: raw.audio_url,
            page_number: raw.page_number,
            juz_number: raw.juz_number,
            hizb_number: raw.hizb_number,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct VersesResponse {
    pub chapter: Option<RawChapterInfo>,
    pub surah: Option<RawChapterInfo>,
    pub verses: Option<Vec<RawVerse>>,
    pub bismillah: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageResponse {
    pub page: Option<PageInfo>,
    pub verses: Option<Vec<RawVerse>>,
}
