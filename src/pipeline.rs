//! Admission checks shared by every write operation.
//!
//! A write runs its validation rules first, then hands the collected
//! violations and the bearer token to [`WriteGate::admit`]. The gate rejects
//! in a fixed order: violations, missing or invalid token, insufficient role.
//! Only an admitted identity may reach the repository.

use log::{debug, warn};

use crate::middleware::auth::{Identity, TokenVerifier};
use crate::user::model::Role;
use crate::utils::error::CustomError;
use crate::utils::validation::Violations;

/// Privilege an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Admin,
    /// Any verified identity.
    Authenticated,
}

impl Access {
    pub fn permits(self, role: Role) -> bool {
        match self {
            Access::Admin => role == Role::Admin,
            Access::Authenticated => true,
        }
    }
}

#[derive(Clone)]
pub struct WriteGate {
    verifier: TokenVerifier,
}

impl WriteGate {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    pub fn admit(
        &self,
        violations: Violations,
        token: Option<&str>,
        access: Access,
    ) -> Result<Identity, CustomError> {
        if !violations.is_empty() {
            debug!("rejecting write with {} violation(s)", violations.len());
            return Err(CustomError::ValidationError(violations));
        }

        let identity = self.verifier.verify(token).map_err(|e| {
            debug!("token rejected: {}", e);
            CustomError::from(e)
        })?;

        if !access.permits(identity.role) {
            warn!(
                "user {} with role {:?} attempted an {:?} operation",
                identity.subject_id, identity.role, access
            );
            return Err(CustomError::ForbiddenError(
                "This action is reserved for admins".to_string(),
            ));
        }

        Ok(identity)
    }
}
