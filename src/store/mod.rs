//! Backing stores owned by a [`Runtime`](crate::Runtime).
//!
//! - [`SlotStore`]: per identity key, the ordered slots hook calls resolve to
//! - [`ContextStore`]: per context key, the shared value and its subscribers

mod context_store;
mod slot_store;

pub use context_store::{ContextKey, ContextStore, Listener};
pub use slot_store::{Slot, SlotStore};
