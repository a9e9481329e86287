use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::comment::model::Comment;
use crate::post::model::{Post, PostSummary, PostThread};
use crate::user::model::User;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A unique key is already taken.
    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    Store(String),
}

/// Storage contract for posts, comments and users.
///
/// Every method is a single-document operation or a plain query; the
/// services sequence them. Posts marked for deletion are invisible to all
/// lookups except [`ContentRepository::find_marked_posts`].
#[async_trait]
pub trait ContentRepository: Send + Sync {
    // --- Reads ---
    /// Live posts, newest first, owners populated.
    async fn list_posts(&self) -> Result<Vec<PostSummary>, RepositoryError>;
    /// Post by title-key with its comments and all usernames populated.
    async fn find_thread(&self, slug: &str) -> Result<Option<PostThread>, RepositoryError>;
    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<Post>, RepositoryError>;
    /// Whether any post holds the slug, marked ones included.
    async fn slug_taken(&self, slug: &str) -> Result<bool, RepositoryError>;
    async fn find_post_by_id(&self, id: &ObjectId) -> Result<Option<Post>, RepositoryError>;
    async fn find_comment_by_id(&self, id: &ObjectId) -> Result<Option<Comment>, RepositoryError>;

    // --- Posts ---
    /// Fails with `Duplicate` when the slug is taken.
    async fn insert_post(&self, post: &Post) -> Result<(), RepositoryError>;
    /// Sets title and body, returning the updated post.
    async fn update_post(
        &self,
        slug: &str,
        title: &str,
        body: &str,
    ) -> Result<Option<Post>, RepositoryError>;
    /// Flags a live post as being deleted and returns it.
    async fn mark_post_deleting(&self, id: &ObjectId) -> Result<Option<Post>, RepositoryError>;
    async fn find_marked_posts(&self) -> Result<Vec<Post>, RepositoryError>;
    /// Removes a post only if it carries the deletion mark.
    async fn remove_marked_post(&self, id: &ObjectId) -> Result<bool, RepositoryError>;

    // --- Comments ---
    async fn insert_comment(&self, comment: &Comment) -> Result<(), RepositoryError>;
    /// Puts the comment id at position 0 of the post's sequence.
    async fn prepend_comment(
        &self,
        slug: &str,
        comment_id: &ObjectId,
    ) -> Result<Option<Post>, RepositoryError>;
    /// Removes the id from the post's sequence; true if the post changed.
    async fn pull_comment(
        &self,
        post_id: &ObjectId,
        comment_id: &ObjectId,
    ) -> Result<bool, RepositoryError>;
    async fn delete_comment(&self, id: &ObjectId) -> Result<bool, RepositoryError>;
    async fn delete_comments(&self, ids: &[ObjectId]) -> Result<u64, RepositoryError>;

    // --- Users ---
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    /// Fails with `Duplicate` when the username is taken.
    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError>;
}

/// Shared handle injected into every service.
pub type RepositoryState = Arc<dyn ContentRepository>;
