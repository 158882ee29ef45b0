//! Identity Toolkit REST client: email/password sign-in.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::session::{AuthSession, User};
use super::types::{AuthErrorCode, BackendError};
use super::AuthService;
use crate::config::BackendConfig;

pub struct IdentityClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    session: AuthSession,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl IdentityClient {
    /// Build a client publishing into `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &BackendConfig, session: AuthSession) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| BackendError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key: config.api_key.clone(), base_url: config.auth_base_url.clone(), session })
    }
}

#[async_trait]
impl AuthService for IdentityClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<User, BackendError> {
        let url = format!("{}/accounts:signInWithPassword?key={}", self.base_url, self.api_key);
        let body = SignInRequest { email, password, return_secure_token: true };
        let response = self.http.post(url).json(&body).send().await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let user = parse_sign_in_response(status, &text)?;
        self.session.sign_in(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        // Id tokens are stateless bearer tokens; dropping ours is the whole sign-out.
        self.session.sign_out();
        Ok(())
    }

    fn session(&self) -> AuthSession {
        self.session.clone()
    }
}

/// Decode a `signInWithPassword` response body.
///
/// Error bodies carry the failure code in `error.message`; anything that is
/// not shaped like one is reported as a plain response error.
pub(crate) fn parse_sign_in_response(status: u16, body: &str) -> Result<User, BackendError> {
    if !(200..300).contains(&status) {
        return match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Err(BackendError::Auth(AuthErrorCode::parse(&envelope.error.message))),
            Err(_) => Err(BackendError::Response { status, body: body.to_owned() }),
        };
    }

    let parsed: SignInResponse = serde_json::from_str(body).map_err(|e| BackendError::Parse(e.to_string()))?;
    Ok(User { uid: parsed.local_id, email: parsed.email, id_token: parsed.id_token })
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
