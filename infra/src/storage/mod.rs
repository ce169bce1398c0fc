//! Filesystem-backed session persistence.

mod file_store;

pub use file_store::FileStore;
