use std::collections::HashMap;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::comment::model::{Comment, CommentView};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    /// Title-key fixed at creation; external lookups go through it.
    pub slug: String,
    pub body: String,
    /// Newest first.
    #[serde(default)]
    pub comments: Vec<ObjectId>,
    pub posted_by: ObjectId,
    pub created: DateTime<Utc>,
    /// Set while a cascade delete is in flight.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deleting: bool,
}

/// Post owner or comment author with the username filled in.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Owner {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub username: Option<String>,
}

impl Owner {
    pub fn unresolved(id: ObjectId) -> Self {
        Self { id, username: None }
    }
}

/// Listing entry: no body, no comments.
#[derive(Debug, Serialize, Clone)]
pub struct PostSummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub slug: String,
    pub posted_by: Owner,
    pub created: DateTime<Utc>,
}

/// A post with its full comment thread.
#[derive(Debug, Serialize, Clone)]
pub struct PostThread {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub comments: Vec<CommentView>,
    pub posted_by: Owner,
    pub created: DateTime<Utc>,
}

impl PostThread {
    /// Builds the thread view. Comments follow the post's sequence; ids with
    /// no matching comment are skipped and unknown owners keep a null username.
    pub fn assemble(post: Post, comments: Vec<Comment>, owners: &HashMap<ObjectId, Owner>) -> Self {
        let owner = |id: ObjectId| owners.get(&id).cloned().unwrap_or_else(|| Owner::unresolved(id));

        let mut by_id: HashMap<ObjectId, Comment> = comments.into_iter().map(|c| (c.id, c)).collect();
        let thread = post
            .comments
            .iter()
            .filter_map(|id| by_id.remove(id))
            .map(|c| CommentView {
                id: c.id,
                content: c.content,
                posted_by: owner(c.posted_by),
                created: c.created,
            })
            .collect();

        PostThread {
            id: post.id,
            title: post.title,
            slug: post.slug,
            body: post.body,
            comments: thread,
            posted_by: owner(post.posted_by),
            created: post.created,
        }
    }
}

#[derive(Deserialize)]
pub struct PostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}
