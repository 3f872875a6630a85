/// Task comments

use tracing::info;

use super::Services;
use crate::auth::permissions::{authorize, has_task_access, Operation};
use crate::error::{DomainError, DomainResult};
use crate::models::{
    comment::{Comment, NewComment},
    user::User,
};
use crate::validation::inputs::AddCommentInput;

/// Adds a comment to a task the actor can see
pub async fn add_comment(services: &Services, actor: Option<&User>, input: AddCommentInput) -> DomainResult<Comment> {
    let actor = authorize(actor, Operation::AddComment)?;
    let store = services.store();

    let task = store
        .find_task(input.task_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Task not found"))?;

    if !has_task_access(store, actor, task.id).await? {
        return Err(DomainError::forbidden("You do not have access to this task"));
    }

    let comment = store
        .create_comment(NewComment {
            text: input.text,
            author: actor.id,
            task: task.id,
        })
        .await?;

    info!(comment_id = %comment.id, task_id = %task.id, actor_id = %actor.id, "Comment added");
    Ok(comment)
}
