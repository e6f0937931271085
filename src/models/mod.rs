#[cfg(feature = "cli")]
pub mod config;
#[cfg(feature = "sqlite")]
pub mod content;
