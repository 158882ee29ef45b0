//! Service order record and its partial-update payload.
//!
//! DESIGN
//! ======
//! Orders are created elsewhere; this crate only reads them and performs the
//! single open -> closed transition. `OrderUpdate::close` is the only way the
//! screens build a write, so the closing timestamp is always the backend's
//! own clock (`TimestampWrite::ServerTime`), never a client reading.

use std::fmt;
use std::str::FromStr;

use time::OffsetDateTime;

// =============================================================================
// STATUS
// =============================================================================

/// Lifecycle status of a service order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    #[default]
    Open,
    Closed,
}

impl OrderStatus {
    /// Wire value stored in the `status` field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(format!("unknown order status '{other}' (expected 'open' or 'closed')")),
        }
    }
}

// =============================================================================
// ORDER
// =============================================================================

/// One equipment repair ticket as stored in the `orders` collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOrder {
    /// Backend-assigned document id.
    pub id: String,
    /// Equipment inventory tag.
    pub patrimony: String,
    pub description: String,
    pub status: OrderStatus,
    /// Resolution text; empty until someone closes the order.
    pub solution: String,
    pub created_at: OffsetDateTime,
    pub closed_at: Option<OffsetDateTime>,
}

// =============================================================================
// UPDATE PAYLOAD
// =============================================================================

/// Value written to a timestamp field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampWrite {
    /// Ask the backend to stamp the field with its own clock at commit time.
    ServerTime,
    /// An explicit, client-supplied instant.
    At(OffsetDateTime),
}

/// Partial write against one order. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub solution: Option<String>,
    pub closed_at: Option<TimestampWrite>,
}

impl OrderUpdate {
    /// Build the close transition: status closed, the given resolution, and a
    /// server-stamped `closed_at`.
    ///
    /// Returns `None` when the resolution is blank. Whitespace-only text counts
    /// as blank, which is stricter than a plain emptiness check; non-blank text
    /// is stored exactly as typed.
    #[must_use]
    pub fn close(solution: &str) -> Option<Self> {
        if solution.trim().is_empty() {
            return None;
        }
        Some(Self {
            status: Some(OrderStatus::Closed),
            solution: Some(solution.to_owned()),
            closed_at: Some(TimestampWrite::ServerTime),
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.solution.is_none() && self.closed_at.is_none()
    }
}

#[cfg(test)]
#[path = "order_test.rs"]
mod tests;
