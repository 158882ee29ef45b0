//! Firestore REST client: point reads, commits, and structured queries.
//!
//! DESIGN
//! ======
//! The client is collection-agnostic; `orders.rs` maps the `orders`
//! collection onto `ServiceOrder`. Field values travel in the REST typed
//! encoding (`{"stringValue": "..."}`), so the helpers here decode and
//! encode the handful of kinds the app stores. Every call is bearer
//! authenticated with the id token from the shared `AuthSession`.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::session::AuthSession;
use super::types::BackendError;
use crate::config::BackendConfig;

pub struct FirestoreClient {
    http: reqwest::Client,
    config: BackendConfig,
    session: AuthSession,
}

/// A stored document: its resource name plus typed field values.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct QueryItem {
    #[serde(default)]
    document: Option<Document>,
}

impl FirestoreClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &BackendConfig, session: AuthSession) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| BackendError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config: config.clone(), session })
    }

    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// `GET .../documents/{collection}/{id}`.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing document or an id that cannot name one,
    /// otherwise request/response/parse errors.
    pub async fn get_document(&self, collection: &str, id: &str) -> Result<Document, BackendError> {
        let url = self.document_url(collection, id)?;
        let token = self.token()?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let text = read_body(response, &format!("{collection}/{id}")).await?;
        parse_document(&text)
    }

    /// `POST .../documents:commit` with the given writes, applied atomically.
    ///
    /// # Errors
    ///
    /// `NotFound` when a write's existence precondition fails, otherwise
    /// request/response errors.
    pub async fn commit(&self, writes: Vec<Value>, target: &str) -> Result<(), BackendError> {
        let token = self.token()?;
        let url = format!("{}:commit", self.config.documents_url());
        let body = serde_json::json!({ "writes": writes });
        let response = self.http.post(url).bearer_auth(token).json(&body).send().await?;
        read_body(response, target).await?;
        Ok(())
    }

    /// `POST .../documents:runQuery` with a structured query.
    ///
    /// # Errors
    ///
    /// Returns request/response/parse errors.
    pub async fn run_query(&self, structured_query: Value) -> Result<Vec<Document>, BackendError> {
        let token = self.token()?;
        let url = format!("{}:runQuery", self.config.documents_url());
        let body = serde_json::json!({ "structuredQuery": structured_query });
        let response = self.http.post(url).bearer_auth(token).json(&body).send().await?;
        let text = read_body(response, "runQuery").await?;
        parse_query_response(&text)
    }

    /// Document URL with `collection` and `id` appended as escaped path segments.
    fn document_url(&self, collection: &str, id: &str) -> Result<reqwest::Url, BackendError> {
        check_document_id(collection, id)?;
        let mut url = reqwest::Url::parse(&self.config.documents_url())
            .map_err(|e| BackendError::Request(format!("documents url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| BackendError::Request("documents url cannot carry a path".to_owned()))?
            .push(collection)
            .push(id);
        Ok(url)
    }

    fn token(&self) -> Result<String, BackendError> {
        self.session.id_token().ok_or(BackendError::Unauthenticated)
    }
}

/// Ids are opaque but must name exactly one path segment.
pub(crate) fn check_document_id(collection: &str, id: &str) -> Result<(), BackendError> {
    if id.is_empty() || id == "." || id == ".." || id.contains('/') {
        return Err(BackendError::NotFound(format!("{collection}/{id}")));
    }
    Ok(())
}

async fn read_body(response: reqwest::Response, target: &str) -> Result<String, BackendError> {
    let status = response.status().as_u16();
    let text = response.text().await?;
    check_status(status, text, target)
}

fn check_status(status: u16, body: String, target: &str) -> Result<String, BackendError> {
    match status {
        200..=299 => Ok(body),
        404 => Err(BackendError::NotFound(target.to_owned())),
        _ => Err(BackendError::Response { status, body }),
    }
}

// =============================================================================
// DECODING
// =============================================================================

pub(crate) fn parse_document(body: &str) -> Result<Document, BackendError> {
    serde_json::from_str(body).map_err(|e| BackendError::Parse(format!("document: {e}")))
}

pub(crate) fn parse_query_response(body: &str) -> Result<Vec<Document>, BackendError> {
    let items: Vec<QueryItem> =
        serde_json::from_str(body).map_err(|e| BackendError::Parse(format!("query response: {e}")))?;
    Ok(items.into_iter().filter_map(|item| item.document).collect())
}

impl Document {
    /// Last path segment of the resource name.
    #[must_use]
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|value| value.get("nullValue").is_none())
    }

    /// # Errors
    ///
    /// Returns a parse error if the field is missing or not a string.
    pub fn string(&self, key: &str) -> Result<String, BackendError> {
        self.optional_string(key)?
            .ok_or_else(|| BackendError::Parse(format!("field `{key}` is missing")))
    }

    /// `None` when the field is absent or null.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the field holds a non-string value.
    pub fn optional_string(&self, key: &str) -> Result<Option<String>, BackendError> {
        let Some(value) = self.field(key) else {
            return Ok(None);
        };
        value
            .get("stringValue")
            .and_then(Value::as_str)
            .map(|s| Some(s.to_owned()))
            .ok_or_else(|| BackendError::Parse(format!("field `{key}` is not a string")))
    }

    /// # Errors
    ///
    /// Returns a parse error if the field is missing or not a timestamp.
    pub fn timestamp(&self, key: &str) -> Result<OffsetDateTime, BackendError> {
        self.optional_timestamp(key)?
            .ok_or_else(|| BackendError::Parse(format!("field `{key}` is missing")))
    }

    /// `None` when the field is absent or null.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the field holds a non-timestamp value.
    pub fn optional_timestamp(&self, key: &str) -> Result<Option<OffsetDateTime>, BackendError> {
        let Some(value) = self.field(key) else {
            return Ok(None);
        };
        let raw = value
            .get("timestampValue")
            .and_then(Value::as_str)
            .ok_or_else(|| BackendError::Parse(format!("field `{key}` is not a timestamp")))?;
        OffsetDateTime::parse(raw, &Rfc3339)
            .map(Some)
            .map_err(|e| BackendError::Parse(format!("field `{key}`: {e}")))
    }
}

// =============================================================================
// ENCODING
// =============================================================================

#[must_use]
pub fn string_value(value: &str) -> Value {
    serde_json::json!({ "stringValue": value })
}

/// # Errors
///
/// Returns a parse error for instants RFC 3339 cannot express (years outside 0..=9999).
pub fn timestamp_value(value: OffsetDateTime) -> Result<Value, BackendError> {
    let rendered = value
        .format(&Rfc3339)
        .map_err(|e| BackendError::Parse(format!("timestamp {value}: {e}")))?;
    Ok(serde_json::json!({ "timestampValue": rendered }))
}

/// Transform asking the backend to stamp `field_path` with its commit time.
#[must_use]
pub fn server_time_transform(field_path: &str) -> Value {
    serde_json::json!({ "fieldPath": field_path, "setToServerValue": "REQUEST_TIME" })
}

#[cfg(test)]
#[path = "firestore_test.rs"]
mod tests;
