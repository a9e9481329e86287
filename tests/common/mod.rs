#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use mongodb::bson::oid::ObjectId;
use serde_json::Value;

use blog_content_api::AppServices;
use blog_content_api::comment::model::Comment;
use blog_content_api::config::AppConfig;
use blog_content_api::database::{
    ContentRepository, InMemoryRepository, RepositoryError, RepositoryState,
};
use blog_content_api::middleware::auth::TokenIssuer;
use blog_content_api::post::model::{Post, PostSummary, PostThread};
use blog_content_api::user::model::{Role, User};

pub struct TestContext {
    pub memory: Arc<InMemoryRepository>,
    pub services: AppServices,
    pub config: AppConfig,
}

impl TestContext {
    pub fn new() -> Self {
        let memory = Arc::new(InMemoryRepository::new());
        Self::with_repository(memory.clone(), memory)
    }

    /// `repo` serves the requests, `memory` is the store underneath it.
    pub fn with_repository(memory: Arc<InMemoryRepository>, repo: RepositoryState) -> Self {
        let config = AppConfig {
            bcrypt_cost: 4,
            ..AppConfig::default()
        };
        let services = AppServices::new(repo, &config);
        Self {
            memory,
            services,
            config,
        }
    }

    pub async fn user(&self, username: &str, role: Role) -> (ObjectId, String) {
        let user = User {
            id: ObjectId::new(),
            username: username.to_string(),
            password: bcrypt::hash("Passw0rd", 4).unwrap(),
            role,
            created: Utc::now(),
        };
        self.memory.insert_user(&user).await.unwrap();
        (user.id, self.token_for(&user.id, role))
    }

    pub async fn admin(&self) -> String {
        self.user("admin", Role::Admin).await.1
    }

    pub async fn standard(&self) -> String {
        self.user("reader", Role::Standard).await.1
    }

    pub fn token_for(&self, id: &ObjectId, role: Role) -> String {
        TokenIssuer::new(&self.config.jwt_secret, Duration::hours(1))
            .issue(id, role)
            .unwrap()
    }
}

/// Builds the full application over a [`TestContext`].
#[macro_export]
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .configure(|cfg| $ctx.services.register(cfg))
                .configure(blog_content_api::router::index::routes)
                .wrap(
                    actix_web::middleware::ErrorHandlers::new().handler(
                        actix_web::http::StatusCode::NOT_FOUND,
                        blog_content_api::middleware::not_found::not_found,
                    ),
                ),
        )
        .await
    };
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub async fn json_body<B: MessageBody>(resp: ServiceResponse<B>) -> Value {
    test::read_body_json(resp).await
}

pub fn oid(value: &Value) -> String {
    value["$oid"].as_str().unwrap().to_string()
}

/// Delegates to the in-memory store with selected operations broken.
pub struct FaultyRepository {
    pub inner: Arc<InMemoryRepository>,
    /// Linking a comment to its post fails with a store error.
    pub fail_link: bool,
    /// Deleting a single comment reports that nothing was deleted.
    pub lose_comment_deletes: bool,
    /// Removing this marked post fails with a store error.
    pub stuck_post: Option<ObjectId>,
}

impl FaultyRepository {
    pub fn over(inner: Arc<InMemoryRepository>) -> Self {
        Self {
            inner,
            fail_link: false,
            lose_comment_deletes: false,
            stuck_post: None,
        }
    }
}

fn store_error() -> RepositoryError {
    RepositoryError::Store("connection reset".to_string())
}

#[async_trait]
impl ContentRepository for FaultyRepository {
    async fn list_posts(&self) -> Result<Vec<PostSummary>, RepositoryError> {
        self.inner.list_posts().await
    }

    async fn find_thread(&self, slug: &str) -> Result<Option<PostThread>, RepositoryError> {
        self.inner.find_thread(slug).await
    }

    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<Post>, RepositoryError> {
        self.inner.find_post_by_slug(slug).await
    }

    async fn slug_taken(&self, slug: &str) -> Result<bool, RepositoryError> {
        self.inner.slug_taken(slug).await
    }

    async fn find_post_by_id(&self, id: &ObjectId) -> Result<Option<Post>, RepositoryError> {
        self.inner.find_post_by_id(id).await
    }

    async fn find_comment_by_id(&self, id: &ObjectId) -> Result<Option<Comment>, RepositoryError> {
        self.inner.find_comment_by_id(id).await
    }

    async fn insert_post(&self, post: &Post) -> Result<(), RepositoryError> {
        self.inner.insert_post(post).await
    }

    async fn update_post(
        &self,
        slug: &str,
        title: &str,
        body: &str,
    ) -> Result<Option<Post>, RepositoryError> {
        self.inner.update_post(slug, title, body).await
    }

    async fn mark_post_deleting(&self, id: &ObjectId) -> Result<Option<Post>, RepositoryError> {
        self.inner.mark_post_deleting(id).await
    }

    async fn find_marked_posts(&self) -> Result<Vec<Post>, RepositoryError> {
        self.inner.find_marked_posts().await
    }

    async fn remove_marked_post(&self, id: &ObjectId) -> Result<bool, RepositoryError> {
        if self.stuck_post == Some(*id) {
            return Err(store_error());
        }
        self.inner.remove_marked_post(id).await
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), RepositoryError> {
        self.inner.insert_comment(comment).await
    }

    async fn prepend_comment(
        &self,
        slug: &str,
        comment_id: &ObjectId,
    ) -> Result<Option<Post>, RepositoryError> {
        if self.fail_link {
            return Err(store_error());
        }
        self.inner.prepend_comment(slug, comment_id).await
    }

    async fn pull_comment(
        &self,
        post_id: &ObjectId,
        comment_id: &ObjectId,
    ) -> Result<bool, RepositoryError> {
        self.inner.pull_comment(post_id, comment_id).await
    }

    async fn delete_comment(&self, id: &ObjectId) -> Result<bool, RepositoryError> {
        if self.lose_comment_deletes {
            return Ok(false);
        }
        self.inner.delete_comment(id).await
    }

    async fn delete_comments(&self, ids: &[ObjectId]) -> Result<u64, RepositoryError> {
        self.inner.delete_comments(ids).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        self.inner.find_user_by_username(username).await
    }

    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError> {
        self.inner.insert_user(user).await
    }
}
