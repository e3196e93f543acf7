use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State, rejection::{JsonRejection, QueryRejection}},
};
use tracing::{debug, info};

use quill_types::api::{
    AddCommentRequest, CommentIdResponse, CommentListResponse, CommentResponse, DeleteCommentRequest,
};

use crate::articles::PostQuery;
use crate::convert::{epoch_millis, parse_int};
use crate::error::ApiError;
use crate::identity::{ANONYMOUS, Identity};
use crate::state::{AppState, with_db};

const PLEASE_AUTHENTICATE: &str = "please authenticate";

/// A request that carries no JSON at all reads as an empty body, so the
/// token check still answers it. Malformed JSON stays a 400.
fn json_or_empty<T: Default>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(req)) => Ok(req),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(e) => Err(ApiError::validation(e.body_text())),
    }
}

/// Resolve a bearer token to a user. Every failure, whatever its cause,
/// becomes the same 403.
async fn authenticate(state: &AppState, token: Option<&str>) -> Result<Identity, ApiError> {
    let token = token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::auth(PLEASE_AUTHENTICATE))?;

    state.identity.verify(token).await.map_err(|e| {
        debug!("Token rejected: {:#}", e);
        ApiError::auth(PLEASE_AUTHENTICATE)
    })
}

pub async fn get_comments(
    State(state): State<AppState>,
    query: Result<Query<PostQuery>, QueryRejection>,
) -> Result<Json<CommentListResponse>, ApiError> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let post_id = parse_int(query.post_id.as_deref())
        .ok_or_else(|| ApiError::validation("required query: postID"))?;

    let rows = with_db(&state, move |db| {
        if db.get_article(post_id)?.is_none() {
            return Ok(None);
        }
        db.list_comments(post_id).map(Some)
    })
    .await?
    .ok_or_else(|| ApiError::not_found("article not found"))?;

    // One lookup per distinct author
    let mut names: HashMap<String, String> = HashMap::new();
    for row in &rows {
        if names.contains_key(&row.user_id) {
            continue;
        }
        let name = match state.identity.display_name(&row.user_id).await {
            Ok(Some(name)) => name,
            Ok(None) => ANONYMOUS.to_string(),
            Err(e) => {
                debug!("Display name lookup failed for {}: {:#}", row.user_id, e);
                ANONYMOUS.to_string()
            }
        };
        names.insert(row.user_id.clone(), name);
    }

    let comments: Vec<CommentResponse> = rows
        .into_iter()
        .map(|row| CommentResponse {
            comment_id: row.id,
            user: names
                .get(&row.user_id)
                .cloned()
                .unwrap_or_else(|| ANONYMOUS.to_string()),
            user_id: row.user_id,
            content: row.content,
            comment_to_post: row.comment_to_post,
            created_at: epoch_millis(&row.created_at),
        })
        .collect();

    Ok(Json(CommentListResponse {
        count: comments.len(),
        comments,
    }))
}

pub async fn add_comment(
    State(state): State<AppState>,
    body: Result<Json<AddCommentRequest>, JsonRejection>,
) -> Result<Json<CommentIdResponse>, ApiError> {
    let req = json_or_empty(body)?;

    let identity = authenticate(&state, req.token.as_deref()).await?;

    let content = req
        .content
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::validation("required body: content"))?;
    let post_id = req
        .post_id
        .as_ref()
        .and_then(|id| id.get())
        .ok_or_else(|| ApiError::validation("required body: postID"))?;

    let uid = identity.uid.clone();
    let comment_id = with_db(&state, move |db| {
        if db.get_article(post_id)?.is_none() {
            return Ok(None);
        }
        db.insert_comment(&uid, &content, post_id).map(Some)
    })
    .await?
    .ok_or_else(|| ApiError::not_found("article not found"))?;

    info!("Comment {} added to article {} by {}", comment_id, post_id, identity.uid);
    Ok(Json(CommentIdResponse { comment_id }))
}

/// Authors may delete their own comments. A missing comment is a 400 here,
/// not a 404.
pub async fn delete_comment(
    State(state): State<AppState>,
    body: Result<Json<DeleteCommentRequest>, JsonRejection>,
) -> Result<Json<CommentIdResponse>, ApiError> {
    let req = json_or_empty(body)?;

    let identity = authenticate(&state, req.token.as_deref()).await?;

    let comment_id = req
        .comment_id
        .as_ref()
        .and_then(|id| id.get())
        .ok_or_else(|| ApiError::validation("required body: commentID"))?;

    let comment = with_db(&state, move |db| db.get_comment(comment_id))
        .await?
        .ok_or_else(|| ApiError::validation("comment not found"))?;

    if comment.user_id != identity.uid {
        return Err(ApiError::auth("only your comment can be deleted"));
    }

    with_db(&state, move |db| db.delete_comment(comment_id)).await?;

    info!("Comment {} deleted by its author {}", comment_id, identity.uid);
    Ok(Json(CommentIdResponse { comment_id }))
}
