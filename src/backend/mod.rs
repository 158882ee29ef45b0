//! Backend: hosted authentication and document-store services.
//!
//! DESIGN
//! ======
//! Screens depend only on the `AuthService` and `OrderStore` traits so tests
//! can swap in recording mocks. The concrete clients speak the hosted REST
//! APIs: `IdentityClient` for password sign-in and `FirestoreClient` for the
//! `orders` collection. Both share one `AuthSession`, the observable
//! signed-in state that the navigation shell subscribes to.

pub mod firestore;
pub mod identity;
pub mod orders;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

use crate::model::{OrderStatus, OrderUpdate, ServiceOrder};

pub use firestore::FirestoreClient;
pub use identity::IdentityClient;
pub use session::{AuthSession, AuthState, User};
pub use types::{AuthErrorCode, BackendError};

/// Name of the collection holding service orders.
pub const ORDERS_COLLECTION: &str = "orders";

// =============================================================================
// SEAMS
// =============================================================================

/// Password authentication against the hosted identity service.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify credentials. On success the shared session flips to signed in.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<User, BackendError>;

    /// Drop the current session.
    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Observable authentication state.
    fn session(&self) -> AuthSession;
}

/// Point reads and partial writes against the `orders` collection.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get_order(&self, id: &str) -> Result<ServiceOrder, BackendError>;

    async fn update_order(&self, id: &str, update: &OrderUpdate) -> Result<(), BackendError>;

    async fn list_orders(&self, status: OrderStatus) -> Result<Vec<ServiceOrder>, BackendError>;
}
