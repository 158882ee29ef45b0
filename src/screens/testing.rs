//! Recording backend mocks shared by the screen tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::macros::datetime;
use tokio::sync::Notify;

use crate::backend::{AuthService, AuthSession, BackendError, OrderStore, User};
use crate::model::{OrderStatus, OrderUpdate, ServiceOrder};

// =========================================================================
// MockAuth
// =========================================================================

pub struct MockAuth {
    session: AuthSession,
    results: Mutex<VecDeque<Result<User, BackendError>>>,
    pub calls: Mutex<Vec<(String, String)>>,
    pub sign_outs: Mutex<usize>,
    pub fail_sign_out: bool,
    gate: Option<Arc<Notify>>,
}

impl MockAuth {
    pub fn new(results: Vec<Result<User, BackendError>>) -> Self {
        Self {
            session: AuthSession::new(),
            results: Mutex::new(results.into()),
            calls: Mutex::new(Vec::new()),
            sign_outs: Mutex::new(0),
            fail_sign_out: false,
            gate: None,
        }
    }

    /// Hold every sign-in call until `gate` is notified.
    pub fn gated(results: Vec<Result<User, BackendError>>, gate: Arc<Notify>) -> Self {
        Self { gate: Some(gate), ..Self::new(results) }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

pub fn user() -> User {
    User { uid: "uid-1".into(), email: "tech@example.com".into(), id_token: "token".into() }
}

#[async_trait]
impl AuthService for MockAuth {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<User, BackendError> {
        self.calls
            .lock()
            .unwrap()
            .push((email.to_owned(), password.to_owned()));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let result = self
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(user()));
        if let Ok(user) = &result {
            self.session.sign_in(user.clone());
        }
        result
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        *self.sign_outs.lock().unwrap() += 1;
        if self.fail_sign_out {
            return Err(BackendError::Request("offline".into()));
        }
        self.session.sign_out();
        Ok(())
    }

    fn session(&self) -> AuthSession {
        self.session.clone()
    }
}

// =========================================================================
// MockStore
// =========================================================================

#[derive(Default)]
pub struct MockStore {
    pub gets: Mutex<VecDeque<Result<ServiceOrder, BackendError>>>,
    pub updates: Mutex<VecDeque<Result<(), BackendError>>>,
    pub lists: Mutex<VecDeque<Result<Vec<ServiceOrder>, BackendError>>>,
    pub get_calls: Mutex<Vec<String>>,
    pub update_calls: Mutex<Vec<(String, OrderUpdate)>>,
    pub list_calls: Mutex<Vec<OrderStatus>>,
    gate: Option<Arc<Notify>>,
}

impl MockStore {
    pub fn with_order(order: ServiceOrder) -> Self {
        let store = Self::default();
        store.gets.lock().unwrap().push_back(Ok(order));
        store
    }

    pub fn gated(self, gate: Arc<Notify>) -> Self {
        Self { gate: Some(gate), ..self }
    }

    pub fn push_get(&self, result: Result<ServiceOrder, BackendError>) {
        self.gets.lock().unwrap().push_back(result);
    }

    pub fn push_update(&self, result: Result<(), BackendError>) {
        self.updates.lock().unwrap().push_back(result);
    }

    pub fn push_list(&self, result: Result<Vec<ServiceOrder>, BackendError>) {
        self.lists.lock().unwrap().push_back(result);
    }

    pub fn update_count(&self) -> usize {
        self.update_calls.lock().unwrap().len()
    }

    async fn wait_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl OrderStore for MockStore {
    async fn get_order(&self, id: &str) -> Result<ServiceOrder, BackendError> {
        self.get_calls.lock().unwrap().push(id.to_owned());
        self.wait_gate().await;
        self.gets
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::NotFound(format!("orders/{id}"))))
    }

    async fn update_order(&self, id: &str, update: &OrderUpdate) -> Result<(), BackendError> {
        self.update_calls
            .lock()
            .unwrap()
            .push((id.to_owned(), update.clone()));
        self.wait_gate().await;
        self.updates.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn list_orders(&self, status: OrderStatus) -> Result<Vec<ServiceOrder>, BackendError> {
        self.list_calls.lock().unwrap().push(status);
        self.wait_gate().await;
        self.lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

// =========================================================================
// Fixtures
// =========================================================================

pub fn open_order(id: &str) -> ServiceOrder {
    ServiceOrder {
        id: id.to_owned(),
        patrimony: "PC-0042".into(),
        description: "screen flickers on boot".into(),
        status: OrderStatus::Open,
        solution: String::new(),
        created_at: datetime!(2022-03-07 12:30 UTC),
        closed_at: None,
    }
}

pub fn closed_order(id: &str) -> ServiceOrder {
    ServiceOrder {
        status: OrderStatus::Closed,
        solution: "replaced the cable".into(),
        closed_at: Some(datetime!(2022-03-08 08:15 UTC)),
        ..open_order(id)
    }
}
