//! Inventory ledger domain module.
//!
//! Stock is never persisted directly: it is derived by folding the ledger of
//! movements for an item. This crate holds the movement records, the fold,
//! and the admission rule for anything that would take stock below zero.
//! Business rules only; no IO, no HTTP, no storage.

pub mod ledger;
pub mod movement;

pub use ledger::{ensure_covers, stock_of};
pub use movement::{Direction, Movement, MovementDraft};
