//! Liveness token tied to one mounted screen.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Cancelled when the owning screen unmounts. Clones share the token, so the
/// host can keep one and unmount the screen while a call is still pending.
#[derive(Debug, Clone, Default)]
pub struct ScreenScope {
    token: CancellationToken,
}

impl ScreenScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn unmount(&self) {
        self.token.cancel();
    }

    /// Run `fut` while the screen is mounted.
    ///
    /// Returns `None` if the scope is (or becomes) unmounted before the
    /// result is available; the caller must then leave its state untouched.
    pub async fn guard<F>(&self, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            () = self.token.cancelled() => None,
            out = fut => self.is_active().then_some(out),
        }
    }
}

#[cfg(test)]
#[path = "scope_test.rs"]
mod tests;
