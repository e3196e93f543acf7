pub mod admin;
pub mod articles;
pub mod comments;
pub mod convert;
pub mod error;
pub mod firebase;
pub mod identity;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// All public routes. Cross-cutting layers (CORS, tracing) are added by the
/// binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/getPost", get(articles::get_post))
        .route("/getCatelogyPosts", get(articles::get_catelogy_posts))
        .route("/findPosts", get(articles::find_posts))
        .route("/getComments", get(comments::get_comments))
        .route("/addComment", post(comments::add_comment))
        .route("/deleteComment", post(comments::delete_comment))
        .route("/admin", post(admin::admin))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
