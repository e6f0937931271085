pub mod errors;
pub mod query;
pub mod scheduler;

pub use errors::{ServiceError, ServiceResult};
