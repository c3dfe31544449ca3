//! Context assembly for mnemon.
//!
//! Wires the retrieval pipeline together: [`ShortTermWindow`] holds the
//! live tail of the conversation, [`Retriever`] ranks the long-term log
//! by blended similarity and recency, and [`ContextAssembler`] splits a
//! token budget between the two and emits the final prompt slice.

pub mod window;
pub mod similarity;
pub mod retriever;
pub mod assembler;

pub use window::ShortTermWindow;
pub use similarity::{cosine_similarity, recency_weights};
pub use retriever::Retriever;
pub use assembler::{AssemblerOptions, ContextAssembler};
