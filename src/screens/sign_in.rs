//! Sign-in screen: email/password form over `AuthService`.
//!
//! A successful sign-in does not navigate from here. The identity client
//! flips the shared `AuthSession`, and the navigation shell, which
//! subscribes to it, moves away from this screen. `loading` is therefore
//! left raised on success.

use std::sync::Arc;

use crate::backend::{AuthErrorCode, AuthService, BackendError};

use super::{Alert, EffectSink, ScreenScope};

const TITLE: &str = "Sign in";

pub const MISSING_CREDENTIALS: Alert = Alert { title: TITLE, message: "Enter your email and password." };
pub const INVALID_EMAIL: Alert = Alert { title: TITLE, message: "Invalid email." };
pub const INVALID_CREDENTIALS: Alert = Alert { title: TITLE, message: "Invalid email or password." };

/// Render model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInView {
    pub email: String,
    /// Password length only; the text itself is never rendered.
    pub password_len: usize,
    /// Submit button shows a spinner and ignores presses.
    pub loading: bool,
}

pub struct SignInScreen {
    auth: Arc<dyn AuthService>,
    effects: EffectSink,
    scope: ScreenScope,
    email: String,
    password: String,
    loading: bool,
}

impl SignInScreen {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthService>, effects: EffectSink) -> Self {
        Self {
            auth,
            effects,
            scope: ScreenScope::new(),
            email: String::new(),
            password: String::new(),
            loading: false,
        }
    }

    /// Handle the host keeps to unmount this screen.
    #[must_use]
    pub fn scope(&self) -> ScreenScope {
        self.scope.clone()
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn view(&self) -> SignInView {
        SignInView { email: self.email.clone(), password_len: self.password.chars().count(), loading: self.loading }
    }

    /// Submit the form: validate locally, then make exactly one sign-in call.
    pub async fn submit(&mut self) {
        if self.loading {
            return;
        }
        if self.email.is_empty() || self.password.is_empty() {
            self.effects.alert(MISSING_CREDENTIALS);
            return;
        }

        self.loading = true;
        let Some(result) = self
            .scope
            .guard(self.auth.sign_in_with_password(&self.email, &self.password))
            .await
        else {
            tracing::debug!("sign-in result discarded, screen unmounted");
            return;
        };

        match result {
            Ok(user) => tracing::info!(uid = %user.uid, "sign-in succeeded"),
            Err(err) => self.on_failure(&err),
        }
    }

    fn on_failure(&mut self, err: &BackendError) {
        tracing::warn!(error = %err, code = err.error_code(), "sign-in failed");
        self.loading = false;
        if let Some(alert) = err.auth_code().and_then(failure_alert) {
            self.effects.alert(alert);
        }
    }
}

impl Drop for SignInScreen {
    fn drop(&mut self) {
        self.scope.unmount();
    }
}

/// Alert for an authentication failure; `None` for codes the user is not told about.
#[must_use]
pub fn failure_alert(code: &AuthErrorCode) -> Option<Alert> {
    match code {
        AuthErrorCode::InvalidEmail => Some(INVALID_EMAIL),
        code if code.is_bad_credentials() => Some(INVALID_CREDENTIALS),
        _ => None,
    }
}

#[cfg(test)]
#[path = "sign_in_test.rs"]
mod tests;
