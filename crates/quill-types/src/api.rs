use serde::{Deserialize, Serialize};

// -- Identifiers --

/// An identifier as clients actually send it: a JSON number, a numeric
/// string, or something unusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseId {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl LooseId {
    /// The integer value, if there is one. Fractional numbers and
    /// non-numeric strings yield `None`.
    pub fn get(&self) -> Option<i64> {
        match self {
            LooseId::Int(v) => Some(*v),
            LooseId::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            LooseId::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<i64> for LooseId {
    fn from(v: i64) -> Self {
        LooseId::Int(v)
    }
}

// -- Errors --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// -- Articles --

/// An article as returned by `getPost`: content decoded, timestamp in epoch
/// milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    pub id: i64,
    pub title: String,
    pub thumbnail: String,
    pub date_published: i64,
    pub description: String,
    pub content: String,
    pub view_count: String,
    #[serde(rename = "catelogyID")]
    pub catelogy_id: i64,
}

/// Category listing row. Carries no content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    pub thumbnail: String,
    pub date_published: i64,
    pub description: String,
    pub view_count: String,
    #[serde(rename = "catelogyID")]
    pub catelogy_id: i64,
}

/// Search result row. Content and timestamp are passed through exactly as
/// stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredArticle {
    pub id: i64,
    pub title: String,
    pub thumbnail: String,
    pub date_published: String,
    pub description: String,
    pub content: String,
    pub view_count: String,
    #[serde(rename = "catelogyID")]
    pub catelogy_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse<T> {
    pub count: usize,
    pub posts: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleIdResponse {
    pub id: i64,
}

// -- Comments --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    #[serde(rename = "commentID")]
    pub comment_id: i64,
    #[serde(rename = "userID")]
    pub user_id: String,
    /// Display name of the author, resolved at read time.
    pub user: String,
    pub content: String,
    #[serde(rename = "commentToPost")]
    pub comment_to_post: i64,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentListResponse {
    pub count: usize,
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentIdResponse {
    #[serde(rename = "commentID")]
    pub comment_id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddCommentRequest {
    pub token: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "postID")]
    pub post_id: Option<LooseId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteCommentRequest {
    pub token: Option<String>,
    #[serde(rename = "commentID")]
    pub comment_id: Option<LooseId>,
}
