use chrono::Utc;
use log::info;
use mongodb::bson::oid::ObjectId;

use crate::database::RepositoryState;
use crate::middleware::auth::TokenIssuer;
use crate::user::model::{CreateUserRequest, LoginRequest, Role, User, UserProfile};
use crate::utils::error::CustomError;
use crate::utils::password_validation;

pub struct UserService {
    repo: RepositoryState,
    issuer: TokenIssuer,
    hash_cost: u32,
}

impl UserService {
    pub fn new(repo: RepositoryState, issuer: TokenIssuer, hash_cost: u32) -> Self {
        UserService {
            repo,
            issuer,
            hash_cost,
        }
    }

    /// New accounts always get the standard role.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserProfile, CustomError> {
        password_validation::validate_username(&request.username)?;
        password_validation::validate_password(&request.password)?;

        // Check if username already exists
        if self
            .repo
            .find_user_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(CustomError::ConflictError(
                "Username already exists".to_string(),
            ));
        }

        let hashed_password = bcrypt::hash(&request.password, self.hash_cost)
            .map_err(|e| CustomError::InternalServerError(e.to_string()))?;

        let user = User {
            id: ObjectId::new(),
            username: request.username,
            password: hashed_password,
            role: Role::Standard,
            created: Utc::now(),
        };
        self.repo.insert_user(&user).await?;

        info!("user {} registered", user.id);
        Ok(user.into())
    }

    pub async fn authenticate_user(&self, username: &str, password: &str) -> Result<User, CustomError> {
        let user = self
            .repo
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| CustomError::UnauthenticatedError("Invalid credentials".to_string()))?;

        if !bcrypt::verify(password, &user.password)
            .map_err(|_| CustomError::InternalServerError("Invalid credentials".to_string()))?
        {
            return Err(CustomError::UnauthenticatedError(
                "Invalid credentials".to_string(),
            ));
        }

        Ok(user)
    }

    /// Returns a signed token carrying the user's id and role.
    pub async fn login(&self, request: LoginRequest) -> Result<String, CustomError> {
        let user = self
            .authenticate_user(&request.username, &request.password)
            .await?;

        self.issuer
            .issue(&user.id, user.role)
            .map_err(|e| CustomError::InternalServerError(format!("Token generation failed: {}", e)))
    }
}
