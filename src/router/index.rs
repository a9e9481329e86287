use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

use crate::comment::index::comment_routes;
use crate::post::index::post_routes;
use crate::user::index::user_routes;
use crate::utils::helpers::service_name;

#[get("/")]
async fn welcome() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Welcome to the blog content API",
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": service_name(),
    }))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(welcome);
    cfg.configure(user_routes);
    cfg.configure(comment_routes);
    cfg.configure(post_routes);
}
