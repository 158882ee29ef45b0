//! Order details screen: show one order and close it while it is open.
//!
//! DESIGN
//! ======
//! ```text
//! Loading --fetch ok--> Open | Closed
//!    |                    |
//!    +--fetch err--> Failed --reload--> Loading
//! Open --close ok--> alert + NavigateBack (state untouched)
//! Open --close err--> alert, stays Open
//! ```
//! The close is never applied locally and the order is not re-read; the
//! list screen the host returns to fetches fresh data.

use std::sync::Arc;

use time::UtcOffset;

use crate::backend::OrderStore;
use crate::model::{OrderStatus, OrderUpdate, ServiceOrder, format_timestamp};

use super::{Alert, EffectSink, ScreenScope, UiEffect};

const TITLE: &str = "Service order";

pub const MISSING_SOLUTION: Alert = Alert { title: TITLE, message: "Describe the solution to close this order." };
pub const CLOSED: Alert = Alert { title: TITLE, message: "Service order closed." };
pub const CLOSE_FAILED: Alert = Alert { title: TITLE, message: "Could not close the service order." };

const LOAD_FAILED: &str = "Could not load the service order.";

// =============================================================================
// STATE
// =============================================================================

/// Order fields prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    pub id: String,
    pub patrimony: String,
    pub description: String,
    pub status: OrderStatus,
    pub solution: String,
    /// Formatted creation time.
    pub when: String,
    /// Formatted closing time, if the order has one.
    pub closed: Option<String>,
}

impl OrderDetails {
    #[must_use]
    pub fn from_order(order: ServiceOrder, offset: UtcOffset) -> Self {
        Self {
            when: format_timestamp(order.created_at, offset),
            closed: order.closed_at.map(|ts| format_timestamp(ts, offset)),
            id: order.id,
            patrimony: order.patrimony,
            description: order.description,
            status: order.status,
            solution: order.solution,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsState {
    Loading,
    Open(OrderDetails),
    Closed(OrderDetails),
    /// The fetch failed; `reload` retries it.
    Failed(String),
}

// =============================================================================
// RENDER MODEL
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: &'static str,
    pub description: String,
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderDetailsView {
    Loading,
    Failed {
        message: String,
    },
    Loaded {
        status: OrderStatus,
        /// Header label: "in progress" or "finished".
        status_label: &'static str,
        equipment: Card,
        problem: Card,
        solution: Card,
        /// Current contents of the resolution input; `None` when it is not offered.
        solution_input: Option<String>,
        close_button: bool,
        submitting: bool,
    },
}

// =============================================================================
// SCREEN
// =============================================================================

pub struct OrderDetailsScreen {
    store: Arc<dyn OrderStore>,
    effects: EffectSink,
    scope: ScreenScope,
    order_id: String,
    display_offset: UtcOffset,
    state: DetailsState,
    solution: String,
    submitting: bool,
}

impl OrderDetailsScreen {
    #[must_use]
    pub fn new(
        store: Arc<dyn OrderStore>,
        effects: EffectSink,
        order_id: impl Into<String>,
        display_offset: UtcOffset,
    ) -> Self {
        Self {
            store,
            effects,
            scope: ScreenScope::new(),
            order_id: order_id.into(),
            display_offset,
            state: DetailsState::Loading,
            solution: String::new(),
            submitting: false,
        }
    }

    #[must_use]
    pub fn scope(&self) -> ScreenScope {
        self.scope.clone()
    }

    #[must_use]
    pub fn state(&self) -> &DetailsState {
        &self.state
    }

    /// The single fetch issued when the screen appears.
    pub async fn mount(&mut self) {
        let Some(result) = self.scope.guard(self.store.get_order(&self.order_id)).await else {
            tracing::debug!(order_id = %self.order_id, "order fetch discarded, screen unmounted");
            return;
        };

        self.state = match result {
            Ok(order) => {
                let details = OrderDetails::from_order(order, self.display_offset);
                match details.status {
                    OrderStatus::Open => DetailsState::Open(details),
                    OrderStatus::Closed => DetailsState::Closed(details),
                }
            }
            Err(err) => {
                tracing::warn!(order_id = %self.order_id, error = %err, code = err.error_code(), "order fetch failed");
                DetailsState::Failed(LOAD_FAILED.to_owned())
            }
        };
    }

    /// Retry the fetch after a failure. No-op in any other state.
    pub async fn reload(&mut self) {
        if !matches!(self.state, DetailsState::Failed(_)) {
            return;
        }
        self.state = DetailsState::Loading;
        self.mount().await;
    }

    pub fn set_solution(&mut self, solution: impl Into<String>) {
        if matches!(self.state, DetailsState::Open(_)) {
            self.solution = solution.into();
        }
    }

    /// Close the order with the entered resolution.
    pub async fn close(&mut self) {
        if !matches!(self.state, DetailsState::Open(_)) || self.submitting {
            return;
        }
        let Some(update) = OrderUpdate::close(&self.solution) else {
            self.effects.alert(MISSING_SOLUTION);
            return;
        };

        self.submitting = true;
        let outcome = self.scope.guard(self.store.update_order(&self.order_id, &update)).await;
        let Some(result) = outcome else {
            tracing::debug!(order_id = %self.order_id, "close result discarded, screen unmounted");
            return;
        };
        self.submitting = false;

        match result {
            Ok(()) => {
                tracing::info!(order_id = %self.order_id, "order closed");
                self.effects.alert(CLOSED);
                self.effects.emit(UiEffect::NavigateBack);
            }
            Err(err) => {
                tracing::warn!(order_id = %self.order_id, error = %err, code = err.error_code(), "order close failed");
                self.effects.alert(CLOSE_FAILED);
            }
        }
    }

    #[must_use]
    pub fn view(&self) -> OrderDetailsView {
        let details = match &self.state {
            DetailsState::Loading => return OrderDetailsView::Loading,
            DetailsState::Failed(message) => return OrderDetailsView::Failed { message: message.clone() },
            DetailsState::Open(details) | DetailsState::Closed(details) => details,
        };
        let open = details.status == OrderStatus::Open;

        OrderDetailsView::Loaded {
            status: details.status,
            status_label: if open { "in progress" } else { "finished" },
            equipment: Card {
                title: "equipment",
                description: format!("patrimony {}", details.patrimony),
                footer: None,
            },
            problem: Card {
                title: "problem description",
                description: details.description.clone(),
                footer: Some(format!("Registered on {}", details.when)),
            },
            solution: Card {
                title: "solution",
                description: details.solution.clone(),
                footer: details.closed.as_ref().map(|closed| format!("Closed on {closed}")),
            },
            solution_input: open.then(|| self.solution.clone()),
            close_button: open,
            submitting: self.submitting,
        }
    }
}

impl Drop for OrderDetailsScreen {
    fn drop(&mut self) {
        self.scope.unmount();
    }
}

#[cfg(test)]
#[path = "order_details_test.rs"]
mod tests;
