use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/completions", post(handlers::create_completion_form))
        .route("/completions/remove", post(handlers::remove_completion_form))
        .route("/goals", post(handlers::create_goal_form))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/pending-goals", get(handlers::get_pending_goals))
        .route(
            "/api/completions",
            post(handlers::create_completion).delete(handlers::remove_completion),
        )
        .route("/api/goals", post(handlers::create_goal))
        .with_state(state)
}
