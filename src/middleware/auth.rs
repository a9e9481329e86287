use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::user::model::Role;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject id. Older tokens carry it as `_id`.
    #[serde(alias = "_id")]
    pub sub: String,
    pub role: Role,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
}

/// Who a verified token speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: ObjectId,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("No token provided")]
    Unauthenticated,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Checks bearer tokens against the signing secret.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: Option<&str>) -> Result<Identity, VerificationError> {
        let token = token.ok_or(VerificationError::Unauthenticated)?;

        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| VerificationError::InvalidToken(e.to_string()))?;

        let subject_id = ObjectId::parse_str(&data.claims.sub)
            .map_err(|_| VerificationError::InvalidToken("malformed subject".to_string()))?;

        Ok(Identity {
            subject_id,
            role: data.claims.role,
        })
    }
}

/// Signs tokens for users that log in.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, user_id: &ObjectId, role: Role) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_hex(),
            role,
            exp: (now + self.ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "unit-test-signing-secret";

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        Utc::now().timestamp() + 3600
    }

    #[test]
    fn missing_token_is_unauthenticated() {
        let verifier = TokenVerifier::new(SECRET);
        assert!(matches!(
            verifier.verify(None),
            Err(VerificationError::Unauthenticated)
        ));
    }

    #[test]
    fn issued_token_round_trips() {
        let issuer = TokenIssuer::new(SECRET, Duration::hours(1));
        let verifier = TokenVerifier::new(SECRET);
        let user_id = ObjectId::new();

        let token = issuer.issue(&user_id, Role::Admin).unwrap();
        let identity = verifier.verify(Some(&token)).unwrap();

        assert_eq!(identity.subject_id, user_id);
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn accepts_legacy_id_claim() {
        let user_id = ObjectId::new();
        let token = sign(
            json!({ "_id": user_id.to_hex(), "role": "standard", "exp": in_one_hour() }),
            SECRET,
        );

        let identity = TokenVerifier::new(SECRET).verify(Some(&token)).unwrap();
        assert_eq!(identity.subject_id, user_id);
        assert_eq!(identity.role, Role::Standard);
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = sign(
            json!({ "sub": ObjectId::new().to_hex(), "role": "admin", "exp": in_one_hour() }),
            "some-other-secret",
        );
        assert!(matches!(
            TokenVerifier::new(SECRET).verify(Some(&token)),
            Err(VerificationError::InvalidToken(_))
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let token = sign(
            json!({
                "sub": ObjectId::new().to_hex(),
                "role": "admin",
                "exp": Utc::now().timestamp() - 3600
            }),
            SECRET,
        );
        assert!(matches!(
            TokenVerifier::new(SECRET).verify(Some(&token)),
            Err(VerificationError::InvalidToken(_))
        ));
    }

    #[test]
    fn rejects_garbage_unknown_role_and_bad_subject() {
        let verifier = TokenVerifier::new(SECRET);
        assert!(verifier.verify(Some("not.a.jwt")).is_err());

        let unknown_role = sign(
            json!({ "sub": ObjectId::new().to_hex(), "role": "owner", "exp": in_one_hour() }),
            SECRET,
        );
        assert!(verifier.verify(Some(&unknown_role)).is_err());

        let bad_subject = sign(
            json!({ "sub": "user-123", "role": "admin", "exp": in_one_hour() }),
            SECRET,
        );
        assert!(verifier.verify(Some(&bad_subject)).is_err());
    }
}
