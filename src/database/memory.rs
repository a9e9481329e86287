use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::comment::model::Comment;
use crate::database::repository::{ContentRepository, RepositoryError};
use crate::post::model::{Owner, Post, PostSummary, PostThread};
use crate::user::model::User;

#[derive(Default)]
struct Collections {
    posts: Vec<Post>,
    comments: HashMap<ObjectId, Comment>,
    users: HashMap<ObjectId, User>,
}

impl Collections {
    fn live_post(&self, matches: impl Fn(&Post) -> bool) -> Option<&Post> {
        self.posts.iter().find(|p| !p.deleting && matches(p))
    }

    fn live_post_mut(&mut self, matches: impl Fn(&Post) -> bool) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| !p.deleting && matches(p))
    }

    fn owners(&self) -> HashMap<ObjectId, Owner> {
        self.users
            .values()
            .map(|u| {
                (
                    u.id,
                    Owner {
                        id: u.id,
                        username: Some(u.username.clone()),
                    },
                )
            })
            .collect()
    }
}

/// Process-local store with the same semantics as the MongoDB one. Each
/// method takes the lock once, so single-document updates stay atomic.
#[derive(Default)]
pub struct InMemoryRepository {
    inner: RwLock<Collections>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of post documents, marked ones included.
    pub async fn post_count(&self) -> usize {
        self.inner.read().await.posts.len()
    }

    pub async fn comment_count(&self) -> usize {
        self.inner.read().await.comments.len()
    }
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn list_posts(&self) -> Result<Vec<PostSummary>, RepositoryError> {
        let state = self.inner.read().await;
        let owners = state.owners();

        let mut posts: Vec<&Post> = state.posts.iter().filter(|p| !p.deleting).collect();
        posts.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| b.id.cmp(&a.id)));

        Ok(posts
            .into_iter()
            .map(|p| PostSummary {
                id: p.id,
                title: p.title.clone(),
                slug: p.slug.clone(),
                posted_by: owners
                    .get(&p.posted_by)
                    .cloned()
                    .unwrap_or_else(|| Owner::unresolved(p.posted_by)),
                created: p.created,
            })
            .collect())
    }

    async fn find_thread(&self, slug: &str) -> Result<Option<PostThread>, RepositoryError> {
        let state = self.inner.read().await;
        let Some(post) = state.live_post(|p| p.slug == slug).cloned() else {
            return Ok(None);
        };

        let comments = post
            .comments
            .iter()
            .filter_map(|id| state.comments.get(id).cloned())
            .collect();

        Ok(Some(PostThread::assemble(post, comments, &state.owners())))
    }

    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<Post>, RepositoryError> {
        let state = self.inner.read().await;
        Ok(state.live_post(|p| p.slug == slug).cloned())
    }

    async fn slug_taken(&self, slug: &str) -> Result<bool, RepositoryError> {
        let state = self.inner.read().await;
        Ok(state.posts.iter().any(|p| p.slug == slug))
    }

    async fn find_post_by_id(&self, id: &ObjectId) -> Result<Option<Post>, RepositoryError> {
        let state = self.inner.read().await;
        Ok(state.live_post(|p| p.id == *id).cloned())
    }

    async fn find_comment_by_id(&self, id: &ObjectId) -> Result<Option<Comment>, RepositoryError> {
        Ok(self.inner.read().await.comments.get(id).cloned())
    }

    async fn insert_post(&self, post: &Post) -> Result<(), RepositoryError> {
        let mut state = self.inner.write().await;
        if state.posts.iter().any(|p| p.slug == post.slug) {
            return Err(RepositoryError::Duplicate("Title already in use".to_string()));
        }
        state.posts.push(post.clone());
        Ok(())
    }

    async fn update_post(
        &self,
        slug: &str,
        title: &str,
        body: &str,
    ) -> Result<Option<Post>, RepositoryError> {
        let mut state = self.inner.write().await;
        Ok(state.live_post_mut(|p| p.slug == slug).map(|post| {
            post.title = title.to_string();
            post.body = body.to_string();
            post.clone()
        }))
    }

    async fn mark_post_deleting(&self, id: &ObjectId) -> Result<Option<Post>, RepositoryError> {
        let mut state = self.inner.write().await;
        Ok(state.live_post_mut(|p| p.id == *id).map(|post| {
            post.deleting = true;
            post.clone()
        }))
    }

    async fn find_marked_posts(&self) -> Result<Vec<Post>, RepositoryError> {
        let state = self.inner.read().await;
        Ok(state.posts.iter().filter(|p| p.deleting).cloned().collect())
    }

    async fn remove_marked_post(&self, id: &ObjectId) -> Result<bool, RepositoryError> {
        let mut state = self.inner.write().await;
        let before = state.posts.len();
        state.posts.retain(|p| !(p.id == *id && p.deleting));
        Ok(state.posts.len() < before)
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), RepositoryError> {
        let mut state = self.inner.write().await;
        state.comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn prepend_comment(
        &self,
        slug: &str,
        comment_id: &ObjectId,
    ) -> Result<Option<Post>, RepositoryError> {
        let mut state = self.inner.write().await;
        Ok(state.live_post_mut(|p| p.slug == slug).map(|post| {
            post.comments.insert(0, *comment_id);
            post.clone()
        }))
    }

    async fn pull_comment(
        &self,
        post_id: &ObjectId,
        comment_id: &ObjectId,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.inner.write().await;
        let Some(post) = state.live_post_mut(|p| p.id == *post_id) else {
            return Ok(false);
        };
        let before = post.comments.len();
        post.comments.retain(|id| id != comment_id);
        Ok(post.comments.len() < before)
    }

    async fn delete_comment(&self, id: &ObjectId) -> Result<bool, RepositoryError> {
        Ok(self.inner.write().await.comments.remove(id).is_some())
    }

    async fn delete_comments(&self, ids: &[ObjectId]) -> Result<u64, RepositoryError> {
        let mut state = self.inner.write().await;
        let removed = ids
            .iter()
            .filter(|id| state.comments.remove(*id).is_some())
            .count();
        Ok(removed as u64)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let state = self.inner.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError> {
        let mut state = self.inner.write().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(RepositoryError::Duplicate("Username already exists".to_string()));
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }
}
