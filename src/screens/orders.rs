//! Orders list screen: status filter, list, open details, sign out.

use std::sync::Arc;

use time::UtcOffset;

use crate::backend::{AuthService, OrderStore};
use crate::model::{OrderStatus, ServiceOrder, format_timestamp};

use super::{Alert, EffectSink, ScreenScope, UiEffect};

pub const SIGN_OUT_FAILED: Alert = Alert { title: "Sign out", message: "Could not sign out." };

const LOAD_FAILED: &str = "Could not load service orders.";

/// One row of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub id: String,
    pub patrimony: String,
    pub status: OrderStatus,
    /// Formatted creation time.
    pub when: String,
}

impl OrderSummary {
    fn from_order(order: &ServiceOrder, offset: UtcOffset) -> Self {
        Self {
            id: order.id.clone(),
            patrimony: order.patrimony.clone(),
            status: order.status,
            when: format_timestamp(order.created_at, offset),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrdersState {
    Loading,
    Loaded(Vec<OrderSummary>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdersView {
    pub filter: OrderStatus,
    pub state: OrdersState,
}

pub struct OrdersScreen {
    auth: Arc<dyn AuthService>,
    store: Arc<dyn OrderStore>,
    effects: EffectSink,
    scope: ScreenScope,
    display_offset: UtcOffset,
    filter: OrderStatus,
    state: OrdersState,
}

impl OrdersScreen {
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthService>,
        store: Arc<dyn OrderStore>,
        effects: EffectSink,
        display_offset: UtcOffset,
    ) -> Self {
        Self {
            auth,
            store,
            effects,
            scope: ScreenScope::new(),
            display_offset,
            filter: OrderStatus::Open,
            state: OrdersState::Loading,
        }
    }

    #[must_use]
    pub fn scope(&self) -> ScreenScope {
        self.scope.clone()
    }

    #[must_use]
    pub fn filter(&self) -> OrderStatus {
        self.filter
    }

    #[must_use]
    pub fn state(&self) -> &OrdersState {
        &self.state
    }

    pub async fn mount(&mut self) {
        self.refresh().await;
    }

    /// Re-read the list for the current filter.
    pub async fn refresh(&mut self) {
        self.state = OrdersState::Loading;
        let Some(result) = self.scope.guard(self.store.list_orders(self.filter)).await else {
            tracing::debug!("order list discarded, screen unmounted");
            return;
        };

        self.state = match result {
            Ok(orders) => {
                let rows = orders
                    .iter()
                    .map(|order| OrderSummary::from_order(order, self.display_offset))
                    .collect();
                OrdersState::Loaded(rows)
            }
            Err(err) => {
                tracing::warn!(filter = %self.filter, error = %err, code = err.error_code(), "order list failed");
                OrdersState::Failed(LOAD_FAILED.to_owned())
            }
        };
    }

    /// Switch the status filter and reload when it changes.
    pub async fn select_filter(&mut self, filter: OrderStatus) {
        if filter == self.filter && !matches!(self.state, OrdersState::Failed(_)) {
            return;
        }
        self.filter = filter;
        self.refresh().await;
    }

    pub fn open(&self, order_id: &str) {
        self.effects.emit(UiEffect::OpenOrder(order_id.to_owned()));
    }

    pub async fn sign_out(&mut self) {
        let Some(result) = self.scope.guard(self.auth.sign_out()).await else {
            return;
        };
        if let Err(err) = result {
            tracing::warn!(error = %err, code = err.error_code(), "sign-out failed");
            self.effects.alert(SIGN_OUT_FAILED);
        }
    }

    #[must_use]
    pub fn view(&self) -> OrdersView {
        OrdersView { filter: self.filter, state: self.state.clone() }
    }
}

impl Drop for OrdersScreen {
    fn drop(&mut self) {
        self.scope.unmount();
    }
}

#[cfg(test)]
#[path = "orders_test.rs"]
mod tests;
