use actix_web::{HttpResponse, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use serde_json::json;

use crate::post::model::PostRequest;
use crate::post::service::PostService;
use crate::utils::error::CustomError;
use crate::utils::helpers::service_name;

/// GET /posts
pub async fn list_posts(post_service: web::Data<PostService>) -> Result<HttpResponse, CustomError> {
    let posts = post_service.list_posts().await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Posts fetched successfully",
        "httpStatusCode": 200,
        "service": service_name(),
        "data": posts
    })))
}

/// GET /posts/{post_id}, where the id is a title-key
pub async fn get_post(
    post_id: web::Path<String>,
    post_service: web::Data<PostService>,
) -> Result<HttpResponse, CustomError> {
    let post = post_service.get_post(&post_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post fetched successfully",
        "httpStatusCode": 200,
        "service": service_name(),
        "data": post
    })))
}

/// POST /posts
pub async fn create_post(
    post_service: web::Data<PostService>,
    post: web::Json<PostRequest>,
    auth: Option<BearerAuth>,
) -> Result<HttpResponse, CustomError> {
    let token = auth.as_ref().map(BearerAuth::token);
    let created = post_service.create_post(post.into_inner(), token).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post created successfully",
        "httpStatusCode": 200,
        "service": service_name(),
        "data": created
    })))
}

/// PUT /posts/{post_id}, where the id is a title-key
pub async fn edit_post(
    post_id: web::Path<String>,
    post_service: web::Data<PostService>,
    post: web::Json<PostRequest>,
    auth: Option<BearerAuth>,
) -> Result<HttpResponse, CustomError> {
    let token = auth.as_ref().map(BearerAuth::token);
    let updated = post_service
        .edit_post(&post_id.into_inner(), post.into_inner(), token)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post updated successfully",
        "httpStatusCode": 200,
        "service": service_name(),
        "data": updated
    })))
}

/// DELETE /posts/{post_id}, where the id is a store id
pub async fn delete_post(
    post_id: web::Path<String>,
    post_service: web::Data<PostService>,
    auth: Option<BearerAuth>,
) -> Result<HttpResponse, CustomError> {
    let token = auth.as_ref().map(BearerAuth::token);
    post_service.delete_post(&post_id.into_inner(), token).await?;

    Ok(HttpResponse::Accepted().json(json!({
        "success": true,
        "message": "Post deleted successfully",
        "httpStatusCode": 202,
        "service": service_name(),
    })))
}
