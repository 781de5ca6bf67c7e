pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::persona::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/personas", post(handlers::handle_generate_persona))
        .with_state(state)
}
