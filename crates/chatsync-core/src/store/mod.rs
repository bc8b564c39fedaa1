//! Document store abstractions.
//!
//! `DocumentStore` is the port the handlers write through; `WritePatch`
//! carries the field-level merge semantics every write relies on. The
//! SQLite implementation lives in chatsync-infra; `MemoryDocumentStore`
//! here backs tests and local development.

pub mod document_store;
pub mod memory;
pub mod patch;

pub use document_store::DocumentStore;
pub use memory::MemoryDocumentStore;
pub use patch::{FieldValue, WritePatch, apply_patch};
