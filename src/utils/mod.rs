pub mod error;
pub mod helpers;
pub mod password_validation;
pub mod validation;
