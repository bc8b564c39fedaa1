//! Reactive handlers.
//!
//! Each handler is a stateless unit of work invoked once per change event:
//! it reads and merge-writes through the [`DocumentStore`] port and
//! terminates. Handlers never communicate with each other directly and
//! never retry internally -- the hosting trigger infrastructure redelivers
//! on failure, and every write is idempotent under redelivery.
//!
//! [`DocumentStore`]: crate::store::DocumentStore

pub mod chat_provisioner;
pub mod message_summarizer;

pub use chat_provisioner::{ChatProvisioner, ProvisionOutcome, SkipReason};
pub use message_summarizer::{MessageSummarizer, SummaryOutcome};
