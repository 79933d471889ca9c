use crate::api::{handlers, AppState};
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/health/live", get(handlers::health_check))
        .route("/health/ready", get(handlers::health_check))
        // Search
        .route("/search", get(handlers::search))
        // Users
        .route("/v1/users", post(handlers::create_user))
        // Questions
        .route("/v1/questions", post(handlers::create_question))
        .route("/v1/questions", get(handlers::list_questions))
        .route("/v1/questions/:id", get(handlers::get_question))
        .route("/v1/questions/:id", put(handlers::update_question))
        .route("/v1/questions/:id/answers", post(handlers::create_answer))
        // Votes
        .route("/v1/votes", post(handlers::cast_vote))
        // Add state
        .with_state(state)
        // Add middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
}
