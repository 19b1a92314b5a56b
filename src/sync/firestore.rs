use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Map, Value};
use thiserror::Error;

use super::config::WriteMode;
use crate::auth::Session;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Authentication failed")]
    AuthFailed,
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Remote per-user document storage
#[async_trait]
pub trait RemoteDocumentStore: Send + Sync {
    /// Write `fields` to the document at `path` (e.g. "users/abc")
    async fn write(
        &self,
        session: &Session,
        path: &str,
        fields: Map<String, Value>,
        mode: WriteMode,
    ) -> Result<(), SyncError>;
}

/// Firestore REST writer
pub struct FirestoreClient {
    client: Client,
    base_url: String,
    project_id: String,
}

impl FirestoreClient {
    pub fn new(base_url: &str, project_id: &str) -> Result<Self, SyncError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
        })
    }

    fn document_url(&self, path: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.base_url,
            self.project_id,
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl RemoteDocumentStore for FirestoreClient {
    async fn write(
        &self,
        session: &Session,
        path: &str,
        fields: Map<String, Value>,
        mode: WriteMode,
    ) -> Result<(), SyncError> {
        let url = self.document_url(path);

        // A field mask limits the write to the named fields, leaving the rest
        let mask: Vec<(&str, &str)> = match mode {
            WriteMode::Merge => fields
                .keys()
                .map(|k| ("updateMask.fieldPaths", k.as_str()))
                .collect(),
            WriteMode::Replace => Vec::new(),
        };

        let body = json!({ "fields": encode_fields(&fields) });

        log::debug!("PATCH {} ({:?}, {} fields)", url, mode, fields.len());

        let response = self
            .client
            .patch(&url)
            .query(&mask)
            .bearer_auth(&session.id_token)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SyncError::AuthFailed),
            status => Err(SyncError::Server {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

/// Encode a JSON object as a Firestore `fields` map
pub fn encode_fields(fields: &Map<String, Value>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect(),
    )
}

/// Encode a JSON value as a Firestore typed value
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            // Firestore carries 64-bit integers as strings
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or(0.0) }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}
