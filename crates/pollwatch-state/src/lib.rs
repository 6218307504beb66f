//! # pollwatch-state
//!
//! Durable alert state, keyed by entity. The run driver is invoked
//! fresh every 1-15 minutes by an external scheduler; everything it
//! remembers between invocations lives here.

pub mod error;
pub mod store;

pub use error::StateStoreError;
pub use store::{FileStateStore, MemoryStateStore, StateStore};
