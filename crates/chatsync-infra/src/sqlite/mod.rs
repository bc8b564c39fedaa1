//! SQLite persistence.

pub mod document;
pub mod pool;

pub use document::SqliteDocumentStore;
pub use pool::DatabasePool;
