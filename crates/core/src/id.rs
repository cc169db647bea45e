//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are numeric and storage-assigned; the newtypes exist so an
//! `ItemId` can never be passed where a `MovementId` is expected.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a catalog item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

/// Identifier of an inventory movement (a ledger record).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovementId(i64);

/// Internal identifier of an order (distinct from the human-facing order number).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(i64);

macro_rules! impl_numeric_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = i64::from_str(s)
                    .map_err(|e| DomainError::validation(format!("{}: {}", $name, e)))?;
                Ok(Self(raw))
            }
        }
    };
}

impl_numeric_newtype!(ItemId, "ItemId");
impl_numeric_newtype!(MovementId, "MovementId");
impl_numeric_newtype!(OrderId, "OrderId");
