use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::user::model::{CreateUserRequest, LoginRequest};
use crate::user::service::UserService;
use crate::utils::error::CustomError;
use crate::utils::helpers::service_name;

pub async fn register_user(
    user_service: web::Data<UserService>,
    user_info: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, CustomError> {
    let user = user_service.create_user(user_info.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "User created successfully",
        "httpStatusCode": 200,
        "service": service_name(),
        "data": user
    })))
}

pub async fn login_user(
    user_service: web::Data<UserService>,
    login_info: web::Json<LoginRequest>,
) -> Result<HttpResponse, CustomError> {
    let token = user_service.login(login_info.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Login successful",
        "httpStatusCode": 200,
        "service": service_name(),
        "token": token
    })))
}
