//! Item catalog domain module.
//!
//! Item identity and price live here; stock does not. The catalog performs no
//! cross-entity checks (deleting an item referenced by orders or movements is
//! permitted; references are orphaned and orders keep their snapshotted price).

pub mod item;

pub use item::{Item, ItemDraft};
