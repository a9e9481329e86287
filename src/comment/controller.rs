use crate::comment::model::CreateCommentRequest;
use crate::comment::service::CommentService;
use crate::utils::error::CustomError;
use crate::utils::helpers::service_name;
use actix_web::{HttpResponse, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use serde_json::json;

/// Comment on a post
/// POST /posts/{post_id}/comments, where the id is a title-key
pub async fn create_comment(
    post_id: web::Path<String>,
    comment_service: web::Data<CommentService>,
    body: web::Json<CreateCommentRequest>,
    auth: Option<BearerAuth>,
) -> Result<HttpResponse, CustomError> {
    let token = auth.as_ref().map(BearerAuth::token);
    let post = comment_service
        .create_comment(&post_id.into_inner(), body.into_inner(), token)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comment created successfully",
        "httpStatusCode": 200,
        "service": service_name(),
        "data": post
    })))
}

/// Delete a comment
/// DELETE /posts/{post_id}/comments/{comment_id}, both store ids
pub async fn delete_comment(
    path: web::Path<(String, String)>,
    comment_service: web::Data<CommentService>,
    auth: Option<BearerAuth>,
) -> Result<HttpResponse, CustomError> {
    let (post_id, comment_id) = path.into_inner();
    let token = auth.as_ref().map(BearerAuth::token);
    comment_service
        .delete_comment(&post_id, &comment_id, token)
        .await?;

    Ok(HttpResponse::Accepted().json(json!({
        "success": true,
        "message": "Comment deleted successfully",
        "httpStatusCode": 202,
        "service": service_name(),
    })))
}
