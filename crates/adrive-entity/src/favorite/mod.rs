//! Favorite domain entities.

pub mod item;
pub mod model;

pub use item::ItemType;
pub use model::{Favorite, FavoriteItem, FavoriteStatus};
