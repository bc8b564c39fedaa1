//! Infrastructure layer for Chatsync.
//!
//! Contains the SQLite implementation of the `DocumentStore` port defined
//! in `chatsync-core`: a WAL-mode database with split reader/writer pools
//! and JSON documents addressed by path.

pub mod sqlite;
