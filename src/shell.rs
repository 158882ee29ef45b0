//! Navigation shell: route stack driven by auth state and screen effects.
//!
//! SYSTEM CONTEXT
//! ==============
//! The shell is the only place that decides which screen is showing. The
//! root route follows the observed `AuthState` (signed out: sign-in,
//! signed in: orders); any auth change resets the stack to the new root.
//! Within a root, screens push and pop through `UiEffect`s.

use tokio::sync::watch;

use crate::backend::{AuthSession, AuthState};
use crate::screens::UiEffect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    SignIn,
    Orders,
    OrderDetails { order_id: String },
}

fn root_for(state: &AuthState) -> Route {
    match state {
        AuthState::SignedOut => Route::SignIn,
        AuthState::SignedIn(_) => Route::Orders,
    }
}

pub struct NavigationShell {
    auth: watch::Receiver<AuthState>,
    root: Route,
    /// Routes pushed above the root.
    stack: Vec<Route>,
}

impl NavigationShell {
    #[must_use]
    pub fn new(session: &AuthSession) -> Self {
        let auth = session.subscribe();
        let root = root_for(&auth.borrow());
        Self { auth, root, stack: Vec::new() }
    }

    #[must_use]
    pub fn current(&self) -> &Route {
        self.stack.last().unwrap_or(&self.root)
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len() + 1
    }

    /// Apply the latest auth state if it changed. Returns true when the stack was re-rooted.
    pub fn sync_auth(&mut self) -> bool {
        if !self.auth.has_changed().unwrap_or(false) {
            return false;
        }
        let root = root_for(&self.auth.borrow_and_update());
        self.reroot(root);
        true
    }

    /// Wait for the next auth change and re-root. Returns false if the session is gone.
    pub async fn auth_changed(&mut self) -> bool {
        if self.auth.changed().await.is_err() {
            return false;
        }
        let root = root_for(&self.auth.borrow_and_update());
        self.reroot(root);
        true
    }

    fn reroot(&mut self, root: Route) {
        tracing::debug!(?root, "navigation re-rooted");
        self.stack.clear();
        self.root = root;
    }

    /// Apply a screen effect to the stack. Alerts do not navigate.
    pub fn apply(&mut self, effect: &UiEffect) {
        match effect {
            UiEffect::Alert(_) => {}
            UiEffect::NavigateBack => {
                self.stack.pop();
            }
            UiEffect::OpenOrder(order_id) => {
                if self.root == Route::Orders {
                    self.stack.push(Route::OrderDetails { order_id: order_id.clone() });
                } else {
                    tracing::warn!(%order_id, "open order ignored while signed out");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "shell_test.rs"]
mod tests;
