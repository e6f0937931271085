//! Core library exports for the Grilla editorial planner.
//!
//! The `data` feature exposes the scheduling core: slot keys and weeks in
//! [`domain`], the in-memory [`store`], the lifecycle engine and grid queries
//! in [`services`], and form parsing in [`forms`]. The `sqlite` feature adds
//! the Diesel persistence collaborator.

#[cfg(feature = "sqlite")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod error_conversions;
#[cfg(feature = "data")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "data")]
pub mod services;
#[cfg(feature = "data")]
pub mod store;
