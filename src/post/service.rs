use chrono::Utc;
use log::{error, info, warn};
use mongodb::bson::oid::ObjectId;

use crate::database::RepositoryState;
use crate::pipeline::{Access, WriteGate};
use crate::post::model::{Post, PostRequest, PostSummary, PostThread};
use crate::utils::error::CustomError;
use crate::utils::helpers::{path_title_key, title_key};
use crate::utils::validation::{Location, Violation, Violations};

pub struct PostService {
    repo: RepositoryState,
    gate: WriteGate,
}

impl PostService {
    pub fn new(repo: RepositoryState, gate: WriteGate) -> Self {
        PostService { repo, gate }
    }

    pub async fn list_posts(&self) -> Result<Vec<PostSummary>, CustomError> {
        Ok(self.repo.list_posts().await?)
    }

    /// Post thread by title-key, as a one element list.
    pub async fn get_post(&self, key: &str) -> Result<Vec<PostThread>, CustomError> {
        let thread = self
            .repo
            .find_thread(&path_title_key(key))
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Post not found".to_string()))?;
        Ok(vec![thread])
    }

    pub async fn create_post(
        &self,
        input: PostRequest,
        token: Option<&str>,
    ) -> Result<Post, CustomError> {
        let mut violations = Violations::new();
        let title = violations
            .body("title", input.title)
            .escape()
            .length(1, 60, "Invalid title length")
            .value();
        let body = violations
            .body("body", input.body)
            .escape()
            .length(0, 1000, "Invalid body length")
            .value();

        let slug = title_key(&title);
        if !violations.has_field("title") && self.repo.slug_taken(&slug).await? {
            violations.push(Violation::invalid(
                Location::Body,
                "title",
                title.clone(),
                "Title already in use",
            ));
        }

        let identity = self.gate.admit(violations, token, Access::Admin)?;

        let post = Post {
            id: ObjectId::new(),
            title,
            slug,
            body,
            comments: Vec::new(),
            posted_by: identity.subject_id,
            created: Utc::now(),
            deleting: false,
        };
        self.repo.insert_post(&post).await?;

        info!("post {} created by {}", post.id, identity.subject_id);
        Ok(post)
    }

    pub async fn edit_post(
        &self,
        key: &str,
        input: PostRequest,
        token: Option<&str>,
    ) -> Result<Post, CustomError> {
        let mut violations = Violations::new();
        let escaped_key = violations.param("postId", key).escape().value();
        let slug = title_key(&escaped_key);
        if self.repo.find_post_by_slug(&slug).await?.is_none() {
            violations.push(Violation::missing(
                Location::Params,
                "postId",
                escaped_key,
                "Post not found",
            ));
        }
        let title = violations
            .body("title", input.title)
            .escape()
            .length(1, 60, "Invalid title length")
            .value();
        let body = violations
            .body("body", input.body)
            .escape()
            .length(1, 1000, "Invalid body length")
            .value();

        let identity = self.gate.admit(violations, token, Access::Admin)?;

        let post = self
            .repo
            .update_post(&slug, &title, &body)
            .await?
            .ok_or_else(|| CustomError::NotFoundAtMutation("Post not found".to_string()))?;

        info!("post {} edited by {}", post.id, identity.subject_id);
        Ok(post)
    }

    /// Deletes a post by store id together with its comments.
    ///
    /// The post is marked first, which hides it and yields its comment ids.
    /// Comments go next and the post document last. A failure part way
    /// leaves the mark for [`PostService::sweep_pending_deletions`].
    pub async fn delete_post(&self, post_id: &str, token: Option<&str>) -> Result<(), CustomError> {
        let mut violations = Violations::new();
        let id = violations
            .param("postId", post_id)
            .escape()
            .object_id("Post not found");
        if let Some(id) = id {
            if self.repo.find_post_by_id(&id).await?.is_none() {
                violations.push(Violation::missing(
                    Location::Params,
                    "postId",
                    post_id,
                    "Post not found",
                ));
            }
        }

        let identity = self.gate.admit(violations, token, Access::Admin)?;
        let Some(id) = id else {
            return Err(CustomError::NotFoundAtMutation("Post not found".to_string()));
        };

        let post = self
            .repo
            .mark_post_deleting(&id)
            .await?
            .ok_or_else(|| CustomError::NotFoundAtMutation("Post not found".to_string()))?;
        let (removed, _) = self.finish_deletion(&post).await?;

        info!(
            "post {} and {} comment(s) deleted by {}",
            post.id, removed, identity.subject_id
        );
        Ok(())
    }

    /// Completes deletions left behind by interrupted requests. A post that
    /// fails is logged and left marked for the next run. Returns how many
    /// posts this run removed.
    pub async fn sweep_pending_deletions(&self) -> Result<usize, CustomError> {
        let marked = self.repo.find_marked_posts().await?;
        let mut swept = 0;
        for post in &marked {
            match self.finish_deletion(post).await {
                Ok((removed, true)) => {
                    swept += 1;
                    info!(
                        "sweep finished deleting post {} and {} comment(s)",
                        post.id, removed
                    );
                }
                Ok((_, false)) => {}
                Err(e) => error!("sweep could not finish deleting post {}: {}", post.id, e),
            }
        }
        Ok(swept)
    }

    /// Deletes the comments of a marked post and then the post. Returns the
    /// number of comments removed and whether this call removed the post.
    async fn finish_deletion(&self, post: &Post) -> Result<(u64, bool), CustomError> {
        let removed = self.repo.delete_comments(&post.comments).await?;
        let post_removed = self.repo.remove_marked_post(&post.id).await?;
        if !post_removed {
            warn!("post {} was already removed by another deletion", post.id);
        }
        Ok((removed, post_removed))
    }
}
