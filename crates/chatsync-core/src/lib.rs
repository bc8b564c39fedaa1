//! Logical core of Chatsync: handlers, store port, and trigger routing.
//!
//! This crate defines the "ports" (the `DocumentStore` trait and the
//! merge-write patch model) that the infrastructure layer implements, plus
//! the two reactive handlers and the declarative routing table that binds
//! change events to them. It depends only on `chatsync-types` -- never on
//! `chatsync-infra` or any database/IO crate.

pub mod dispatch;
pub mod handler;
pub mod store;
