use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::database::RepositoryError;
use crate::middleware::auth::VerificationError;
use crate::utils::helpers::service_name;
use crate::utils::validation::Violations;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("Validation failed")]
    ValidationError(Violations),

    #[error("Unauthenticated: {0}")]
    UnauthenticatedError(String),

    #[error("Forbidden: {0}")]
    ForbiddenError(String),

    #[error("Bad Request: {0}")]
    BadRequestError(String),

    #[error("Conflict: {0}")]
    ConflictError(String),

    #[error("Not Found: {0}")]
    NotFoundError(String),

    /// The resource passed validation but was gone when the write ran.
    #[error("Not Found At Mutation: {0}")]
    NotFoundAtMutation(String),

    #[error("Storage Failure: {0}")]
    StorageFailure(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl CustomError {
    fn error_code(&self) -> &'static str {
        match self {
            CustomError::ValidationError(..) => "VALIDATION_ERROR",
            CustomError::UnauthenticatedError(..) => "UNAUTHENTICATED_ERROR",
            CustomError::ForbiddenError(..) => "FORBIDDEN_ERROR",
            CustomError::BadRequestError(..) => "BAD_REQUEST_ERROR",
            CustomError::ConflictError(..) => "CONFLICT_ERROR",
            CustomError::NotFoundError(..) => "NOT_FOUND_ERROR",
            CustomError::NotFoundAtMutation(..) => "NOT_FOUND_AT_MUTATION_ERROR",
            CustomError::StorageFailure(..) => "STORAGE_FAILURE",
            CustomError::InternalServerError(..) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match self {
            CustomError::ValidationError(violations) if violations.any_missing() => {
                StatusCode::NOT_FOUND
            }
            CustomError::ValidationError(..) => StatusCode::BAD_REQUEST,
            CustomError::UnauthenticatedError(..) => StatusCode::UNAUTHORIZED,
            CustomError::ForbiddenError(..) => StatusCode::FORBIDDEN,
            CustomError::BadRequestError(..) => StatusCode::BAD_REQUEST,
            CustomError::ConflictError(..) => StatusCode::CONFLICT,
            CustomError::NotFoundError(..) => StatusCode::NOT_FOUND,
            CustomError::NotFoundAtMutation(..) => StatusCode::INTERNAL_SERVER_ERROR,
            CustomError::StorageFailure(..) => StatusCode::INTERNAL_SERVER_ERROR,
            CustomError::InternalServerError(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = json!({
            "success": false,
            "message": self.to_string(),
            "httpStatusCode": self.status_code().as_u16(),
            "error": self.error_code(),
            "service": service_name(),
        });

        if let CustomError::ValidationError(violations) = self {
            body["errors"] = json!(violations);
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<RepositoryError> for CustomError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(msg) => CustomError::ConflictError(msg),
            RepositoryError::Store(msg) => {
                error!("store operation failed: {}", msg);
                CustomError::StorageFailure("Store operation failed".to_string())
            }
        }
    }
}

// Missing and invalid tokens look the same to the client.
impl From<VerificationError> for CustomError {
    fn from(err: VerificationError) -> Self {
        CustomError::UnauthenticatedError(err.to_string())
    }
}
