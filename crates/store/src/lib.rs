//! Message log implementations for mnemon.
//!
//! Both backends implement `mnemon_core::MessageStore` and take their
//! embedder by injection: the store computes a vector for every appended
//! turn but never decides where vectors come from.

pub mod in_memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
