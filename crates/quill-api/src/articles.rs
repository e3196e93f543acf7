use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;

use quill_db::models::ArticleRow;
use quill_types::api::{ArticleResponse, ArticleSummary, PostListResponse, StoredArticle};

use crate::convert::{decode_content, epoch_millis, parse_int};
use crate::error::ApiError;
use crate::state::{AppState, with_db};

/// Shortest accepted search term is this plus one.
const MIN_SEARCH_LEN: usize = 2;

#[derive(Debug, Default, Deserialize)]
pub struct PostQuery {
    #[serde(rename = "postID")]
    pub post_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CatelogyQuery {
    #[serde(rename = "catelogyID")]
    pub catelogy_id: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

pub async fn get_post(
    State(state): State<AppState>,
    query: Result<Query<PostQuery>, QueryRejection>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let post_id = parse_int(query.post_id.as_deref())
        .ok_or_else(|| ApiError::validation("required query: postID"))?;

    let article = with_db(&state, move |db| db.record_view(post_id))
        .await?
        .ok_or_else(|| ApiError::not_found("article not found"))?;

    Ok(Json(ArticleResponse {
        id: article.id,
        title: article.title,
        thumbnail: article.thumbnail,
        date_published: epoch_millis(&article.date_published),
        description: article.description,
        content: decode_content(article.content),
        view_count: article.view_count,
        catelogy_id: article.catelogy_id,
    }))
}

/// List one category, or every category when `catelogyID` is negative.
pub async fn get_catelogy_posts(
    State(state): State<AppState>,
    query: Result<Query<CatelogyQuery>, QueryRejection>,
) -> Result<Json<PostListResponse<ArticleSummary>>, ApiError> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let catelogy_id = parse_int(query.catelogy_id.as_deref())
        .ok_or_else(|| ApiError::validation("required query: catelogyID"))?;

    let filter = (catelogy_id >= 0).then_some(catelogy_id);
    let limit = parse_int(query.limit.as_deref())
        .filter(|&l| l > 0)
        .map(|l| u32::try_from(l).unwrap_or(u32::MAX));

    // `count` is the total for the filter; only `posts` is cut by the limit
    let (count, rows) = with_db(&state, move |db| {
        Ok((db.count_articles(filter)?, db.list_articles(filter, limit)?))
    })
    .await?;
    let posts: Vec<ArticleSummary> = rows.into_iter().map(summary).collect();

    Ok(Json(PostListResponse { count, posts }))
}

/// Title substring search. Unlike the other listings, rows come back exactly
/// as stored: raw content and the stored timestamp string.
pub async fn find_posts(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<PostListResponse<StoredArticle>>, ApiError> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let term = query
        .search
        .filter(|s| s.chars().count() > MIN_SEARCH_LEN)
        .ok_or_else(|| ApiError::validation("required query: search"))?;

    let rows = with_db(&state, move |db| db.search_articles(&term)).await?;
    let posts: Vec<StoredArticle> = rows.into_iter().map(stored).collect();

    Ok(Json(PostListResponse {
        count: posts.len(),
        posts,
    }))
}

fn summary(row: ArticleRow) -> ArticleSummary {
    ArticleSummary {
        id: row.id,
        title: row.title,
        thumbnail: row.thumbnail,
        date_published: epoch_millis(&row.date_published),
        description: row.description,
        view_count: row.view_count,
        catelogy_id: row.catelogy_id,
    }
}

fn stored(row: ArticleRow) -> StoredArticle {
    StoredArticle {
        id: row.id,
        title: row.title,
        thumbnail: row.thumbnail,
        date_published: row.date_published,
        description: row.description,
        content: row.content,
        view_count: row.view_count,
        catelogy_id: row.catelogy_id,
    }
}
