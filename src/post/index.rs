use super::controller::{create_post, delete_post, edit_post, get_post, list_posts};
use actix_web::web;

pub fn post_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/posts")
            .route("", web::get().to(list_posts))
            .route("", web::post().to(create_post))
            .route("/{post_id}", web::get().to(get_post))
            .route("/{post_id}", web::put().to(edit_post))
            .route("/{post_id}", web::delete().to(delete_post)),
    );
}
