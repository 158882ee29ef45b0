//! Observable authentication state.
//!
//! DESIGN
//! ======
//! `AuthSession` wraps a `tokio::sync::watch` channel. The identity client
//! publishes into it; the navigation shell subscribes and re-roots its route
//! stack when the state changes. The sign-in screen never looks at it, so a
//! successful sign-in and the resulting navigation stay decoupled.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// The signed-in account.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub uid: String,
    pub email: String,
    /// Bearer token for document calls.
    pub id_token: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("id_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    SignedOut,
    SignedIn(User),
}

impl AuthState {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::SignedOut => None,
        }
    }
}

/// Shared handle to the current `AuthState`. Clones observe the same state.
#[derive(Clone)]
pub struct AuthSession {
    tx: Arc<watch::Sender<AuthState>>,
}

impl AuthSession {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::SignedOut);
        Self { tx: Arc::new(tx) }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn current(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    /// Bearer token of the signed-in user, if any.
    #[must_use]
    pub fn id_token(&self) -> Option<String> {
        self.tx.borrow().user().map(|user| user.id_token.clone())
    }

    pub fn sign_in(&self, user: User) {
        tracing::info!(uid = %user.uid, "session signed in");
        self.tx.send_replace(AuthState::SignedIn(user));
    }

    /// Clear the session. Subscribers are only notified if someone was signed in.
    pub fn sign_out(&self) {
        let changed = self.tx.send_if_modified(|state| {
            if *state == AuthState::SignedOut {
                return false;
            }
            *state = AuthState::SignedOut;
            true
        });
        if changed {
            tracing::info!("session signed out");
        }
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession").field("state", &*self.tx.borrow()).finish()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
