//! Append-only result store, persisted as one JSON array on disk.

mod error;
pub use error::StoreError;

mod json;
pub use json::ResultStore;
