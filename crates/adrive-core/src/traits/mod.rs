//! Core traits defined in `adrive-core` and implemented by other crates.

pub mod storage;

pub use storage::StorageProvider;
