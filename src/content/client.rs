use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::models::*;
use crate::storage::{ChapterId, ScriptType};

/// Default content API host
pub const DEFAULT_BASE_URL: &str = "https://quran.shayanshehzadqureshi.workers.dev";

/// Verses requested per chapter; larger than the longest surah
pub const DEFAULT_PER_PAGE: u32 = 300;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server error: {status} - {message}")]
    Status { status: u16, message: String },
    #[error("Missing field in response: {0}")]
    MissingField(&'static str),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, ContentError>;

/// Read-only client for chapters, verses, pages and reciters.
///
/// Every call is a fresh round trip; nothing is cached or retried.
pub struct QuranClient {
    client: Client,
    base_url: String,
    per_page: u32,
}

impl QuranClient {
    pub fn new(base_url: &str) -> Result<Self> {
        // Normalize URL - ensure no trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ContentError::InvalidUrl(
                "URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(Self {
            client: Client::builder().build()?,
            base_url,
            per_page: DEFAULT_PER_PAGE,
        })
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/qf/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.url(path);
        log::debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(ContentError::Status {
                    status: 404,
                    message: format!("{} not found", path),
                });
            }
            status => {
                return Err(ContentError::Status {
                    status: status.as_u16(),
                    message: response.text().await.unwrap_or_default(),
                });
            }
        }

        Ok(response.json().await?)
    }

    /// List all 114 chapters
    pub async fn get_chapters(&self) -> Result<Vec<Chapter>> {
        let data: ChaptersResponse = self.get_json("chapters", &[]).await?;
        Ok(data.chapters)
    }

    /// Fetch a chapter with every verse, its translation and audio
    pub async fn get_surah(
        &self,
        chapter_id: ChapterId,
        reciter_id: Option<u32>,
        script: ScriptType,
    ) -> Result<SurahWithVerses> {
        let mut query = vec![
            ("chapter", chapter_id.to_string()),
            ("perPage", self.per_page.to_string()),
            ("textFormat", TextFormat::from(script).as_str().to_string()),
        ];
        if let Some(id) = reciter_id {
            query.push(("reciterId", id.to_string()));
        }

        let data: VersesResponse = self.get_json("verses", &query).await?;

        let verses = data.verses.ok_or(ContentError::MissingField("verses"))?;
        let info = data
            .chapter
            .or(data.surah)
            .ok_or(ContentError::MissingField("chapter"))?;

        Ok(SurahWithVerses {
            surah: info.into(),
            bismillah: data.bismillah,
            ayahs: verses.into_iter().map(Verse::from).collect(),
            metadata: data.metadata,
        })
    }

    /// List available reciters
    pub async fn get_reciters(&self) -> Result<Vec<Reciter>> {
        let data: RecitersResponse = self.get_json("reciters", &[]).await?;
        Ok(data.reciters)
    }

    /// Fetch one mushaf page
    pub async fn get_page(&self, page_number: u32, script: ScriptType) -> Result<PageData> {
        let query = [
            ("pageNumber", page_number.to_string()),
            ("textFormat", TextFormat::from(script).as_str().to_string()),
        ];
        let data: PageResponse = self.get_json("page", &query).await?;

        Ok(PageData {
            page: data.page.ok_or(ContentError::MissingField("page"))?,
            verses: data
                .verses
                .ok_or(ContentError::MissingField("verses"))?
                .into_iter()
                .map(Verse::from)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_rejects_non_http_url() {
        assert!(matches!(
            QuranClient::new("ftp://example.com"),
            Err(ContentError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_get_chapters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/qf/chapters"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "chapters": [{
                    "id": 1,
                    "name_arabic": "الفاتحة",
                    "name_simple": "Al-Fatihah",
                    "name_complex": "Al-Fātiĥah",
                    "revelation_place": "makkah",
                    "verses_count": 7,
                    "pages": [1, 1],
                    "translated_name": {"name": "The Opener", "language_name": "english"}
                }]
            })))
            .mount(&server)
            .await;

        let client = QuranClient::new(&format!("{}/", server.uri())).unwrap();
        let chapters = client.get_chapters().await.unwrap();
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].verses_count, 7);
        assert_eq!(chapters[0].translated_name.as_ref().unwrap().name, "The Opener");
    }

    #[tokio::test]
    async fn test_get_surah_maps_script_and_reciter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/qf/verses"))
            .and(query_param("chapter", "112"))
            .and(query_param("perPage", "300"))
            .and(query_param("textFormat", "imlaei"))
            .and(query_param("reciterId", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "surah": {
                    "id": 112, "name_arabic": "الإخلاص", "name_simple": "Al-Ikhlas",
                    "revelation_place": "makkah", "verses_count": 4, "bismillah_pre": true
                },
                "bismillah": "بِسْمِ ٱللَّهِ",
                "verses": [
                    {"id": 6222, "key": "112:1", "number": 1, "text": "قُلْ هُوَ ٱللَّهُ أَحَدٌ",
                     "translationHtml": "Say, He is Allah, One", "audioUrl": "https://audio/112001.mp3",
                     "page_number": 604, "juz_number": 30}
                ],
                "metadata": {"total": 4}
            })))
            .mount(&server)
            .await;

        let client = QuranClient::new(&server.uri()).unwrap();
        let surah = client.get_surah(112, Some(7), ScriptType::Indopak).await.unwrap();
        assert_eq!(surah.surah.id, 112);
        assert!(surah.surah.has_bismillah);
        assert_eq!(surah.ayahs.len(), 1);
        assert_eq!(surah.ayahs[0].translation, "Say, He is Allah, One");
        assert_eq!(surah.ayahs[0].page_number, Some(604));
    }

    #[tokio::test]
    async fn test_get_surah_without_verses_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/qf/verses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "chapter": {"id": 1, "verses_count": 7}
            })))
            .mount(&server)
            .await;

        let client = QuranClient::new(&server.uri()).unwrap();
        let err = client.get_surah(1, None, ScriptType::Uthmani).await.unwrap_err();
        assert!(matches!(err, ContentError::MissingField("verses")));
    }

    #[tokio::test]
    async fn test_server_error_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/qf/reciters"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client = QuranClient::new(&server.uri()).unwrap();
        match client.get_reciters().await {
            Err(ContentError::Status { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/qf/chapters"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = QuranClient::new(&server.uri()).unwrap();
        assert!(matches!(client.get_chapters().await, Err(ContentError::Http(_))));
    }

    #[tokio::test]
    async fn test_get_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/qf/page"))
            .and(query_param("pageNumber", "2"))
            .and(query_param("textFormat", "uthmani"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": {"number": 2, "total_pages": 604, "juz_number": 1, "hizb_number": 1},
                "verses": [{"key": "2:1", "number": 1, "text": "الٓمٓ", "hizb_number": 1}]
            })))
            .mount(&server)
            .await;

        let client = QuranClient::new(&server.uri()).unwrap();
        let page = client.get_page(2, ScriptType::Uthmani).await.unwrap();
        assert_eq!(page.page.total_pages, Some(604));
        assert_eq!(page.verses[0].key, "2:1");
        assert_eq!(page.verses[0].hizb_number, Some(1));
    }
}
