pub mod catalog;
pub mod content;
pub mod slot;
pub mod types;
pub mod week;
