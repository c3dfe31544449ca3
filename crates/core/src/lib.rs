//! # Mnemon Core
//!
//! Domain types, traits, and error definitions for the mnemon memory
//! subsystem. This crate has **zero framework dependencies**; it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The two seams of the system live here as traits: [`Embedder`] maps text
//! to fixed-width vectors, [`MessageStore`] is the durable conversation
//! log. Implementations live in their own crates, which keeps the
//! dependency graph pointing inward and makes stub implementations in
//! tests cheap.

pub mod error;
pub mod message;
pub mod embedder;
pub mod store;
pub mod token;

// Re-export key types at crate root for ergonomics
pub use error::{EmbedderError, Error, MemoryError, Result};
pub use message::{ContextEntry, Message, ParseRoleError, Role};
pub use embedder::Embedder;
pub use store::MessageStore;
pub use token::{TokenCounter, WordCounter};
