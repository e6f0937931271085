//! Error conversion glue between the domain, forms, store and service layers.
//!
//! The domain layer must not depend on service/repository error types, so
//! the conversions live here.

use crate::domain::types::TypeConstraintError;
use crate::forms::content::ContentFormError;
use crate::repository::RepositoryError;
use crate::services::ServiceError;
use crate::store::SlotConflict;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::InvalidRequest(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl From<ContentFormError> for ServiceError {
    fn from(val: ContentFormError) -> Self {
        ServiceError::InvalidRequest(val.to_string())
    }
}

impl From<SlotConflict> for ServiceError {
    fn from(val: SlotConflict) -> Self {
        ServiceError::InvalidRequest(val.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_errors_become_invalid_requests() {
        let err: ServiceError = TypeConstraintError::EmptyString("product").into();
        assert!(matches!(err, ServiceError::InvalidRequest(_)));

        let err: RepositoryError = TypeConstraintError::NonPositiveId("content id").into();
        assert!(matches!(err, RepositoryError::ValidationError(_)));
    }
}
