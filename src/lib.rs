pub mod comment;
pub mod config;
pub mod database;
pub mod middleware;
pub mod pipeline;
pub mod post;
pub mod router;
pub mod user;
pub mod utils;

use actix_web::web;

use crate::comment::service::CommentService;
use crate::config::AppConfig;
use crate::database::RepositoryState;
use crate::middleware::auth::{TokenIssuer, TokenVerifier};
use crate::middleware::error_handler::json_error_handler;
use crate::pipeline::WriteGate;
use crate::post::service::PostService;
use crate::user::service::UserService;

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppServices {
    pub posts: web::Data<PostService>,
    pub comments: web::Data<CommentService>,
    pub users: web::Data<UserService>,
}

impl AppServices {
    pub fn new(repo: RepositoryState, config: &AppConfig) -> Self {
        let gate = WriteGate::new(TokenVerifier::new(&config.jwt_secret));
        let issuer = TokenIssuer::new(
            &config.jwt_secret,
            chrono::Duration::hours(config.token_ttl_hours),
        );

        AppServices {
            posts: web::Data::new(PostService::new(repo.clone(), gate.clone())),
            comments: web::Data::new(CommentService::new(repo.clone(), gate)),
            users: web::Data::new(UserService::new(repo, issuer, config.bcrypt_cost)),
        }
    }

    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.posts.clone())
            .app_data(self.comments.clone())
            .app_data(self.users.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler));
    }
}
