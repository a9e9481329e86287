use actix_web::error::JsonPayloadError;
use actix_web::{Error, HttpRequest};
use log::debug;

use crate::utils::error::CustomError;

/// Renders unreadable JSON bodies with the standard error envelope.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    debug!("rejecting body for {}: {}", req.path(), err);
    CustomError::BadRequestError(err.to_string()).into()
}
