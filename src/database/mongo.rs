use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use log::info;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};
use serde::Deserialize;

use crate::comment::model::Comment;
use crate::database::repository::{ContentRepository, RepositoryError};
use crate::post::model::{Owner, Post, PostSummary, PostThread};
use crate::user::model::User;

const DUPLICATE_KEY: i32 = 11000;

impl From<MongoError> for RepositoryError {
    fn from(err: MongoError) -> Self {
        RepositoryError::Store(err.to_string())
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

/// Listing projection of a post document.
#[derive(Deserialize)]
struct PostHeader {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    slug: String,
    posted_by: ObjectId,
    created: DateTime<Utc>,
}

pub struct MongoRepository {
    posts: Collection<Post>,
    comments: Collection<Comment>,
    users: Collection<User>,
}

impl MongoRepository {
    pub fn new(db: &Database) -> Self {
        MongoRepository {
            posts: db.collection::<Post>("posts"),
            comments: db.collection::<Comment>("comments"),
            users: db.collection::<User>("users"),
        }
    }

    /// Unique keys the services rely on: post slugs and usernames.
    pub async fn ensure_indexes(&self) -> Result<(), RepositoryError> {
        let unique = || IndexOptions::builder().unique(true).build();

        self.posts
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "slug": 1 })
                    .options(unique())
                    .build(),
            )
            .await?;
        self.users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "username": 1 })
                    .options(unique())
                    .build(),
            )
            .await?;

        info!("MongoDB indexes are in place");
        Ok(())
    }

    async fn owners(&self, ids: Vec<ObjectId>) -> Result<HashMap<ObjectId, Owner>, RepositoryError> {
        let ids: Vec<ObjectId> = ids.into_iter().collect::<HashSet<_>>().into_iter().collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let owners: Vec<Owner> = self
            .users
            .clone_with_type::<Owner>()
            .find(doc! { "_id": { "$in": ids } })
            .projection(doc! { "username": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(owners.into_iter().map(|owner| (owner.id, owner)).collect())
    }
}

#[async_trait]
impl ContentRepository for MongoRepository {
    async fn list_posts(&self) -> Result<Vec<PostSummary>, RepositoryError> {
        // ObjectIds grow with creation time, so _id order is creation order.
        let headers: Vec<PostHeader> = self
            .posts
            .clone_with_type::<PostHeader>()
            .find(doc! { "deleting": { "$ne": true } })
            .projection(doc! { "body": 0, "comments": 0 })
            .sort(doc! { "_id": -1 })
            .await?
            .try_collect()
            .await?;

        let owners = self.owners(headers.iter().map(|h| h.posted_by).collect()).await?;

        Ok(headers
            .into_iter()
            .map(|h| PostSummary {
                id: h.id,
                title: h.title,
                slug: h.slug,
                posted_by: owners
                    .get(&h.posted_by)
                    .cloned()
                    .unwrap_or_else(|| Owner::unresolved(h.posted_by)),
                created: h.created,
            })
            .collect())
    }

    async fn find_thread(&self, slug: &str) -> Result<Option<PostThread>, RepositoryError> {
        let Some(post) = self.find_post_by_slug(slug).await? else {
            return Ok(None);
        };

        let comments: Vec<Comment> = if post.comments.is_empty() {
            Vec::new()
        } else {
            self.comments
                .find(doc! { "_id": { "$in": post.comments.clone() } })
                .await?
                .try_collect()
                .await?
        };

        let mut owner_ids = vec![post.posted_by];
        owner_ids.extend(comments.iter().map(|c| c.posted_by));
        let owners = self.owners(owner_ids).await?;

        Ok(Some(PostThread::assemble(post, comments, &owners)))
    }

    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<Post>, RepositoryError> {
        Ok(self
            .posts
            .find_one(doc! { "slug": slug, "deleting": { "$ne": true } })
            .await?)
    }

    async fn slug_taken(&self, slug: &str) -> Result<bool, RepositoryError> {
        let count = self
            .posts
            .count_documents(doc! { "slug": slug })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    async fn find_post_by_id(&self, id: &ObjectId) -> Result<Option<Post>, RepositoryError> {
        Ok(self
            .posts
            .find_one(doc! { "_id": *id, "deleting": { "$ne": true } })
            .await?)
    }

    async fn find_comment_by_id(&self, id: &ObjectId) -> Result<Option<Comment>, RepositoryError> {
        Ok(self.comments.find_one(doc! { "_id": *id }).await?)
    }

    async fn insert_post(&self, post: &Post) -> Result<(), RepositoryError> {
        self.posts.insert_one(post).await.map_err(|e| {
            if is_duplicate_key(&e) {
                RepositoryError::Duplicate("Title already in use".to_string())
            } else {
                e.into()
            }
        })?;
        Ok(())
    }

    async fn update_post(
        &self,
        slug: &str,
        title: &str,
        body: &str,
    ) -> Result<Option<Post>, RepositoryError> {
        Ok(self
            .posts
            .find_one_and_update(
                doc! { "slug": slug, "deleting": { "$ne": true } },
                doc! { "$set": { "title": title, "body": body } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn mark_post_deleting(&self, id: &ObjectId) -> Result<Option<Post>, RepositoryError> {
        Ok(self
            .posts
            .find_one_and_update(
                doc! { "_id": *id, "deleting": { "$ne": true } },
                doc! { "$set": { "deleting": true } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn find_marked_posts(&self) -> Result<Vec<Post>, RepositoryError> {
        Ok(self
            .posts
            .find(doc! { "deleting": true })
            .await?
            .try_collect()
            .await?)
    }

    async fn remove_marked_post(&self, id: &ObjectId) -> Result<bool, RepositoryError> {
        let result = self
            .posts
            .delete_one(doc! { "_id": *id, "deleting": true })
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), RepositoryError> {
        self.comments.insert_one(comment).await?;
        Ok(())
    }

    async fn prepend_comment(
        &self,
        slug: &str,
        comment_id: &ObjectId,
    ) -> Result<Option<Post>, RepositoryError> {
        Ok(self
            .posts
            .find_one_and_update(
                doc! { "slug": slug, "deleting": { "$ne": true } },
                doc! { "$push": { "comments": { "$each": [*comment_id], "$position": 0 } } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn pull_comment(
        &self,
        post_id: &ObjectId,
        comment_id: &ObjectId,
    ) -> Result<bool, RepositoryError> {
        let result = self
            .posts
            .update_one(
                doc! { "_id": *post_id, "deleting": { "$ne": true } },
                doc! { "$pull": { "comments": *comment_id } },
            )
            .await?;
        Ok(result.modified_count > 0)
    }

    async fn delete_comment(&self, id: &ObjectId) -> Result<bool, RepositoryError> {
        let result = self.comments.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_comments(&self, ids: &[ObjectId]) -> Result<u64, RepositoryError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = self
            .comments
            .delete_many(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;
        Ok(result.deleted_count)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.find_one(doc! { "username": username }).await?)
    }

    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError> {
        self.users.insert_one(user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                RepositoryError::Duplicate("Username already exists".to_string())
            } else {
                e.into()
            }
        })?;
        Ok(())
    }
}
