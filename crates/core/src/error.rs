//! Domain error model.

use thiserror::Error;

use crate::id::{ItemId, MovementId};

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Reference to the resource a failure is about, so the boundary layer can
/// report what was missing without reaching back into storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Item(ItemId),
    Movement(MovementId),
    Order(String),
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Resource::Item(id) => write!(f, "item {id}"),
            Resource::Movement(id) => write!(f, "movement {id}"),
            Resource::Order(no) => write!(f, "order {no}"),
        }
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (validation,
/// invariants, missing resources). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A requested resource was not found.
    #[error("{0} not found")]
    NotFound(Resource),

    /// A withdrawal or order quantity exceeds the derived available stock.
    #[error("insufficient stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: ItemId,
        requested: u32,
        available: i64,
    },

    /// Persisted state does not match its expected shape. Fatal, never
    /// silently recovered.
    #[error("corrupt state: {0}")]
    Corruption(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn item_not_found(id: ItemId) -> Self {
        Self::NotFound(Resource::Item(id))
    }

    pub fn movement_not_found(id: MovementId) -> Self {
        Self::NotFound(Resource::Movement(id))
    }

    pub fn order_not_found(order_no: impl Into<String>) -> Self {
        Self::NotFound(Resource::Order(order_no.into()))
    }

    pub fn corruption(msg: impl Into<String>) -> Self {
        Self::Corruption(msg.into())
    }
}
