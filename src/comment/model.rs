use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::post::model::Owner;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub content: String,
    pub posted_by: ObjectId,
    pub created: DateTime<Utc>,
}

/// A comment as shown inside a post thread.
#[derive(Debug, Serialize, Clone)]
pub struct CommentView {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub content: String,
    pub posted_by: Owner,
    pub created: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub content: Option<String>,
}
