use chrono::Utc;
use log::{error, info, warn};
use mongodb::bson::oid::ObjectId;

use crate::comment::model::{Comment, CreateCommentRequest};
use crate::database::RepositoryState;
use crate::pipeline::{Access, WriteGate};
use crate::post::model::Post;
use crate::utils::error::CustomError;
use crate::utils::helpers::title_key;
use crate::utils::validation::{Location, Violation, Violations};

pub struct CommentService {
    repo: RepositoryState,
    gate: WriteGate,
}

impl CommentService {
    pub fn new(repo: RepositoryState, gate: WriteGate) -> Self {
        CommentService { repo, gate }
    }

    /// Adds a comment to the post with the given title-key and returns the
    /// updated post. The comment is stored first and then linked at the head
    /// of the post's sequence; if linking fails the comment is removed again.
    pub async fn create_comment(
        &self,
        key: &str,
        input: CreateCommentRequest,
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
        let content = violations
            .body("content", input.content)
            .length(1, 500, "Invalid length")
            .value();

        let identity = self
            .gate
            .admit(violations.only_first_per_field(), token, Access::Authenticated)?;

        let comment = Comment {
            id: ObjectId::new(),
            content,
            posted_by: identity.subject_id,
            created: Utc::now(),
        };
        self.repo.insert_comment(&comment).await?;

        match self.repo.prepend_comment(&slug, &comment.id).await {
            Ok(Some(post)) => {
                info!(
                    "comment {} added to post {} by {}",
                    comment.id, post.id, identity.subject_id
                );
                Ok(post)
            }
            Ok(None) => {
                self.discard_unlinked(&comment.id).await;
                Err(CustomError::NotFoundAtMutation("Post not found".to_string()))
            }
            Err(e) => {
                self.discard_unlinked(&comment.id).await;
                Err(e.into())
            }
        }
    }

    /// Removes a comment from a post, both given by store id. The comment
    /// document is only deleted when it was actually linked to that post.
    pub async fn delete_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        token: Option<&str>,
    ) -> Result<(), CustomError> {
        let mut violations = Violations::new();
        let post_oid = violations
            .param("postId", post_id)
            .escape()
            .object_id("Post not found");
        if let Some(id) = post_oid {
            if self.repo.find_post_by_id(&id).await?.is_none() {
                violations.push(Violation::missing(
                    Location::Params,
                    "postId",
                    post_id,
                    "Post not found",
                ));
            }
        }
        let comment_oid = violations
            .param("commentId", comment_id)
            .escape()
            .object_id("Comment not found");
        if let Some(id) = comment_oid {
            if self.repo.find_comment_by_id(&id).await?.is_none() {
                violations.push(Violation::missing(
                    Location::Params,
                    "commentId",
                    comment_id,
                    "Comment not found",
                ));
            }
        }

        let identity = self
            .gate
            .admit(violations.only_first_per_field(), token, Access::Admin)?;
        let (Some(post_oid), Some(comment_oid)) = (post_oid, comment_oid) else {
            return Err(CustomError::NotFoundAtMutation(
                "Post or comment not found".to_string(),
            ));
        };

        if !self.repo.pull_comment(&post_oid, &comment_oid).await? {
            return Err(CustomError::NotFoundError(
                "Comment not found in this post".to_string(),
            ));
        }

        if !self.repo.delete_comment(&comment_oid).await? {
            error!(
                "comment {} was unlinked from post {} but could not be deleted",
                comment_oid, post_oid
            );
            return Err(CustomError::StorageFailure(
                "Failed to delete comment".to_string(),
            ));
        }

        info!(
            "comment {} removed from post {} by {}",
            comment_oid, post_oid, identity.subject_id
        );
        Ok(())
    }

    async fn discard_unlinked(&self, comment_id: &ObjectId) {
        match self.repo.delete_comment(comment_id).await {
            Ok(_) => warn!(
                "comment {} could not be linked to its post and was removed",
                comment_id
            ),
            Err(e) => error!("comment {} is orphaned: {}", comment_id, e),
        }
    }
}
