use super::controller::{create_comment, delete_comment};
use actix_web::web;

// Registered ahead of the /posts scope, which would otherwise claim these paths.
pub fn comment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/posts/{post_id}/comments").route(web::post().to(create_comment)),
    )
    .service(
        web::resource("/posts/{post_id}/comments/{comment_id}")
            .route(web::delete().to(delete_comment)),
    );
}
