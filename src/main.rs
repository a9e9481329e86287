use std::io;
use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlers, Logger};
use actix_web::{App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};

use blog_content_api::AppServices;
use blog_content_api::config::{AppConfig, StoreBackend};
use blog_content_api::database::{self, InMemoryRepository, MongoRepository, RepositoryState};
use blog_content_api::middleware::not_found::not_found;
use blog_content_api::post::service::PostService;
use blog_content_api::router::index::routes;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logger with environment variable support
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let repo: RepositoryState = match config.store {
        StoreBackend::Mongo => {
            let db = database::connect_to_mongo(&config)
                .await
                .map_err(io::Error::other)?;
            let repo = MongoRepository::new(&db);
            repo.ensure_indexes().await.map_err(io::Error::other)?;
            Arc::new(repo)
        }
        StoreBackend::Memory => {
            warn!("using the in-memory store; data is lost on shutdown");
            Arc::new(InMemoryRepository::new())
        }
    };

    let services = AppServices::new(repo, &config);
    spawn_deletion_sweep(services.posts.clone(), config.sweep_interval_secs);

    info!("Starting server on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| services.register(cfg))
            .configure(routes)
            .wrap(ErrorHandlers::new().handler(StatusCode::NOT_FOUND, not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    info!("Server has stopped");

    Ok(())
}

/// Periodically finishes post deletions that were interrupted mid-cascade.
fn spawn_deletion_sweep(posts: actix_web::web::Data<PostService>, every_secs: u64) {
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(every_secs.max(1)));
        loop {
            interval.tick().await;
            match posts.sweep_pending_deletions().await {
                Ok(0) => {}
                Ok(n) => info!("deletion sweep removed {} post(s)", n),
                Err(e) => error!("deletion sweep failed: {}", e),
            }
        }
    });
}
