//! Assembly of populated post views.

use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use chirp_core::result::AppResult;
use chirp_database::{PostStore, UserStore};
use chirp_entity::post::{CommentView, Post, PostView};
use chirp_entity::user::UserSummary;

/// Resolve authors and comments for `posts`, keeping their order.
///
/// Loads every comment and every referenced user in one query each.
pub async fn populate(
    posts: Vec<Post>,
    post_store: &dyn PostStore,
    user_store: &dyn UserStore,
) -> AppResult<Vec<PostView>> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
    let comments = post_store.comments_for(&post_ids).await?;

    let mut author_ids: Vec<Uuid> = posts
        .iter()
        .map(|p| p.user_id)
        .chain(comments.iter().map(|c| c.user_id))
        .collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors: HashMap<Uuid, UserSummary> = user_store
        .find_many(&author_ids)
        .await?
        .iter()
        .map(|u| (u.id, u.summary()))
        .collect();

    let mut comments_by_post: HashMap<Uuid, Vec<CommentView>> = HashMap::new();
    for comment in comments {
        if let Some(author) = authors.get(&comment.user_id) {
            comments_by_post
                .entry(comment.post_id)
                .or_default()
                .push(CommentView::new(comment, author.clone()));
        }
    }

    Ok(posts
        .into_iter()
        .filter_map(|post| {
            let Some(author) = authors.get(&post.user_id) else {
                warn!(post_id = %post.id, "Skipping post with unknown author");
                return None;
            };
            let comments = comments_by_post.remove(&post.id).unwrap_or_default();
            Some(PostView::new(post, author.clone(), comments))
        })
        .collect())
}
