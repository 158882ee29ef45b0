//! Backend error types.

use std::fmt;

// =============================================================================
// AUTH ERROR CODES
// =============================================================================

/// Authentication failure reasons the client distinguishes.
///
/// Anything outside the known set lands in `Unrecognized` with the raw code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorCode {
    InvalidEmail,
    UserNotFound,
    WrongPassword,
    /// Unknown account or wrong password, reported without telling them apart.
    InvalidCredentials,
    Unrecognized(String),
}

impl AuthErrorCode {
    /// Parse either an SDK-style code (`auth/invalid-email`) or a REST
    /// error message (`INVALID_EMAIL`, optionally followed by ` : detail`).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let code = raw.split(" : ").next().unwrap_or(raw).trim();
        match code {
            "auth/invalid-email" | "INVALID_EMAIL" => Self::InvalidEmail,
            "auth/user-not-found" | "EMAIL_NOT_FOUND" => Self::UserNotFound,
            "auth/wrong-password" | "INVALID_PASSWORD" => Self::WrongPassword,
            "auth/invalid-credential" | "INVALID_LOGIN_CREDENTIALS" => Self::InvalidCredentials,
            other => Self::Unrecognized(other.to_owned()),
        }
    }

    /// True for codes that mean "these credentials do not match an account".
    #[must_use]
    pub fn is_bad_credentials(&self) -> bool {
        matches!(self, Self::UserNotFound | Self::WrongPassword | Self::InvalidCredentials)
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => f.write_str("auth/invalid-email"),
            Self::UserNotFound => f.write_str("auth/user-not-found"),
            Self::WrongPassword => f.write_str("auth/wrong-password"),
            Self::InvalidCredentials => f.write_str("auth/invalid-credential"),
            Self::Unrecognized(code) => f.write_str(code),
        }
    }
}

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backend client operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The identity service rejected the credentials.
    #[error("authentication failed: {0}")]
    Auth(AuthErrorCode),

    /// The requested document does not exist.
    #[error("document not found: {0}")]
    NotFound(String),

    /// A document call was attempted without a signed-in user.
    #[error("not signed in")]
    Unauthenticated,

    /// The HTTP request could not be completed.
    #[error("request failed: {0}")]
    Request(String),

    /// The service returned a non-success HTTP status.
    #[error("response error: status {status}")]
    Response { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl BackendError {
    /// Grepable error code for structured logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Auth(_) => "E_AUTH",
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::Unauthenticated => "E_UNAUTHENTICATED",
            Self::Request(_) => "E_REQUEST",
            Self::Response { .. } => "E_RESPONSE",
            Self::Parse(_) => "E_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    /// The auth failure code, if this is an authentication rejection.
    #[must_use]
    pub fn auth_code(&self) -> Option<&AuthErrorCode> {
        match self {
            Self::Auth(code) => Some(code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
