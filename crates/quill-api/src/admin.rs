use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use tracing::{debug, info, warn};

use quill_crypto::EnvelopeError;
use quill_crypto::envelope;
use quill_db::models::NewArticle;
use quill_types::admin::{AdminCommand, AdminOperation, AdminRequest};
use quill_types::api::{ArticleIdResponse, CommentIdResponse, LooseId};

use crate::error::ApiError;
use crate::state::{AppState, with_db};

/// Single entry point for privileged commands. Each request carries one
/// command sealed with the admin private key and stamped with the admin's
/// clock.
pub async fn admin(
    State(state): State<AppState>,
    body: Result<Json<AdminRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let blob = body
        .ok()
        .and_then(|Json(req)| req.encrypted)
        .ok_or(ApiError::Decode)?;

    let command = envelope::open(&state.admin_key, &blob, envelope::now_millis()).map_err(|e| match e {
        EnvelopeError::Expired => {
            warn!("Rejected stale admin command");
            ApiError::auth("expired")
        }
        other => {
            debug!("Admin envelope rejected: {}", other);
            ApiError::Decode
        }
    })?;

    match command.operation() {
        Some(AdminOperation::AddArticle) => add_article(&state, command).await,
        Some(AdminOperation::RemoveArticle) => remove_article(&state, command).await,
        Some(AdminOperation::RemoveComment) => remove_comment(&state, command).await,
        None => Err(ApiError::validation("unknown operation")),
    }
}

/// Every field must be truthy, so a numeric `catelogyID` of 0 is refused
/// too. The string `"0"` is truthy and passes.
fn new_article(command: AdminCommand) -> Option<NewArticle> {
    let present = |field: Option<String>| field.filter(|v| !v.is_empty());
    let catelogy = command.catelogy_id.filter(|id| match id {
        LooseId::Int(v) => *v != 0,
        LooseId::Float(v) => *v != 0.0,
        _ => true,
    })?;

    Some(NewArticle {
        title: present(command.title)?,
        thumbnail: present(command.thumbnail)?,
        description: present(command.description)?,
        content: present(command.content)?,
        catelogy_id: catelogy.get()?,
        date_published: None,
    })
}

async fn add_article(state: &AppState, command: AdminCommand) -> Result<Response, ApiError> {
    let article = new_article(command).ok_or_else(|| {
        ApiError::validation("required fields: title, thumbnail, description, content, catelogyID")
    })?;

    let title = article.title.clone();
    let id = with_db(state, move |db| db.insert_article(&article)).await?;

    info!("Admin added article {} ({})", id, title);
    Ok(Json(ArticleIdResponse { id }).into_response())
}

async fn remove_article(state: &AppState, command: AdminCommand) -> Result<Response, ApiError> {
    let id = command
        .post_id
        .and_then(|id| id.get())
        .ok_or_else(|| ApiError::validation("required fields: postID"))?;

    let removed = with_db(state, move |db| db.delete_article(id)).await?;
    if !removed {
        return Err(ApiError::not_found("article not found"));
    }

    info!("Admin removed article {}", id);
    Ok(Json(ArticleIdResponse { id }).into_response())
}

async fn remove_comment(state: &AppState, command: AdminCommand) -> Result<Response, ApiError> {
    let comment_id = command
        .comment_id
        .and_then(|id| id.get())
        .ok_or_else(|| ApiError::validation("required fields: commentID"))?;

    let removed = with_db(state, move |db| db.delete_comment(comment_id)).await?;
    if !removed {
        return Err(ApiError::not_found("comment not found"));
    }

    info!("Admin removed comment {}", comment_id);
    Ok(Json(CommentIdResponse { comment_id }).into_response())
}
