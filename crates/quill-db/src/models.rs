/// Database row types — these map directly to SQLite rows.
/// Distinct from quill-types API models to keep the DB layer independent.

#[derive(Debug, Clone)]
pub struct ArticleRow {
    pub id: i64,
    pub title: String,
    pub thumbnail: String,
    pub date_published: String,
    pub description: String,
    /// Empty for rows loaded by the summary projection.
    pub content: String,
    pub view_count: String,
    pub catelogy_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub thumbnail: String,
    pub description: String,
    pub content: String,
    pub catelogy_id: i64,
    /// RFC 3339 timestamp; the insert time when `None`.
    pub date_published: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CommentRow {
    pub id: i64,
    pub user_id: String,
    pub content: String,
    pub comment_to_post: i64,
    pub created_at: String,
}
