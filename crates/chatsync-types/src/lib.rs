//! Shared domain types for Chatsync.
//!
//! This crate contains the documents and events exchanged between the
//! booking workflow, the document store, and the reactive handlers:
//! bookings, chat threads, messages, change events, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod booking;
pub mod chat;
pub mod error;
pub mod event;
