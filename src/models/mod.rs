mod health;
mod item;

pub use health::Health;
pub use item::{Item, ItemChanges, NewItem};
