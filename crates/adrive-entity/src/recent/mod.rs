//! Recent-access domain entities.

pub mod model;

pub use model::{RecentAccess, RecentItem};
