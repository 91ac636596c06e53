//! # adrive-database
//!
//! SQLite connection management and concrete repository implementations
//! for all A-Drive entities.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
