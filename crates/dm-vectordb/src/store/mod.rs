//! Durable storage for the index: atomic file writes and the binary codec.

pub mod codec;
mod file_store;

pub use file_store::FileStore;
