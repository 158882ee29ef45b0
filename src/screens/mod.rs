//! Screen controllers.
//!
//! DESIGN
//! ======
//! Each screen is a headless view-model: it owns its local fields, calls the
//! backend through the `AuthService`/`OrderStore` seams, and exposes a plain
//! render model through `view()`. Anything the host must do (show a modal
//! alert, navigate) is sent as a `UiEffect` over an unbounded channel, so a
//! screen never reaches into the navigation stack directly.
//!
//! Every remote call runs under the screen's `ScreenScope`; results that
//! arrive after the screen is unmounted are dropped.

pub mod order_details;
pub mod orders;
pub mod scope;
pub mod sign_in;

#[cfg(test)]
pub(crate) mod testing;

use tokio::sync::mpsc;

pub use order_details::{DetailsState, OrderDetails, OrderDetailsScreen, OrderDetailsView};
pub use orders::{OrderSummary, OrdersScreen, OrdersState, OrdersView};
pub use scope::ScreenScope;
pub use sign_in::{SignInScreen, SignInView};

/// Blocking modal message shown by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    pub title: &'static str,
    pub message: &'static str,
}

/// Instruction from a screen to its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    Alert(Alert),
    /// Return to the previous screen.
    NavigateBack,
    /// Show the details screen for this order id.
    OpenOrder(String),
}

/// Sending half of the effect channel handed to every screen.
#[derive(Debug, Clone)]
pub struct EffectSink {
    tx: mpsc::UnboundedSender<UiEffect>,
}

impl EffectSink {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UiEffect>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn alert(&self, alert: Alert) {
        self.emit(UiEffect::Alert(alert));
    }

    pub fn emit(&self, effect: UiEffect) {
        if self.tx.send(effect).is_err() {
            tracing::debug!("ui effect dropped, host is gone");
        }
    }
}
