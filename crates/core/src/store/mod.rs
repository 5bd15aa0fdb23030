//! SQLite-backed store for named asset caches.
//!
//! This module is the server-side rendition of the browser CacheStorage the
//! offline worker drives. It provides a persistent store using SQLite with
//! async access via tokio-rusqlite. It supports:
//!
//! - Named caches keyed by a version tag
//! - Per-URL asset entries within each cache
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Whole-cache deletion for version rollover

pub mod assets;
pub mod connection;
pub mod migrations;

pub use crate::Error;

pub use assets::CachedAsset;
pub use connection::CacheDb;
