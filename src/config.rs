//! Backend configuration parsed from environment variables.

use time::UtcOffset;
use time::macros::format_description;

pub const DEFAULT_AUTH_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_DATABASE: &str = "(default)";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {var}")]
    Missing { var: &'static str },
    #[error("config parse failed: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub api_key: String,
    pub project_id: String,
    pub database: String,
    pub auth_base_url: String,
    pub firestore_base_url: String,
    pub timeouts: HttpTimeouts,
    /// Offset used when rendering timestamps on screen.
    pub display_offset: UtcOffset,
}

impl BackendConfig {
    /// Build typed backend config from environment variables.
    ///
    /// Required:
    /// - `REPAIRDESK_API_KEY`: web API key of the hosted project
    /// - `REPAIRDESK_PROJECT_ID`
    ///
    /// Optional:
    /// - `REPAIRDESK_DATABASE`: default `(default)`
    /// - `REPAIRDESK_AUTH_BASE_URL`: Identity Toolkit base URL
    /// - `REPAIRDESK_FIRESTORE_BASE_URL`: Firestore REST base URL
    /// - `REPAIRDESK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `REPAIRDESK_CONNECT_TIMEOUT_SECS`: default 10
    /// - `REPAIRDESK_DISPLAY_OFFSET`: `+HH:MM` / `-HH:MM`, default UTC
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`BackendConfig::from_env`] but reads values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(&lookup, "REPAIRDESK_API_KEY")?;
        let project_id = required(&lookup, "REPAIRDESK_PROJECT_ID")?;
        let database = lookup("REPAIRDESK_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_owned());
        let auth_base_url = base_url(lookup("REPAIRDESK_AUTH_BASE_URL"), DEFAULT_AUTH_BASE_URL);
        let firestore_base_url = base_url(lookup("REPAIRDESK_FIRESTORE_BASE_URL"), DEFAULT_FIRESTORE_BASE_URL);
        let timeouts = HttpTimeouts {
            request_secs: parse_u64(&lookup, "REPAIRDESK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_u64(&lookup, "REPAIRDESK_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let display_offset = match lookup("REPAIRDESK_DISPLAY_OFFSET") {
            Some(raw) => parse_offset(&raw)?,
            None => UtcOffset::UTC,
        };

        Ok(Self { api_key, project_id, database, auth_base_url, firestore_base_url, timeouts, display_offset })
    }

    /// Root of the document tree, e.g. `.../projects/p/databases/(default)/documents`.
    #[must_use]
    pub fn documents_url(&self) -> String {
        format!("{}/projects/{}/databases/{}/documents", self.firestore_base_url, self.project_id, self.database)
    }

    /// Fully qualified resource name of a document, as used in commit writes.
    #[must_use]
    pub fn document_name(&self, collection: &str, id: &str) -> String {
        format!("projects/{}/databases/{}/documents/{collection}/{id}", self.project_id, self.database)
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing { var: key })
}

fn base_url(raw: Option<String>, default: &str) -> String {
    raw.as_deref().unwrap_or(default).trim_end_matches('/').to_owned()
}

fn parse_u64<F>(lookup: &F, key: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::Parse(format!("{key} must be an integer, got '{raw}'"))),
        None => Ok(default),
    }
}

fn parse_offset(raw: &str) -> Result<UtcOffset, ConfigError> {
    let layout = format_description!("[offset_hour sign:mandatory]:[offset_minute]");
    UtcOffset::parse(raw.trim(), layout)
        .map_err(|_| ConfigError::Parse(format!("REPAIRDESK_DISPLAY_OFFSET must look like -03:00, got '{raw}'")))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
