use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use super::handlers;
use crate::orchestrator::Orchestrator;

pub fn create_router() -> Router<Arc<Orchestrator>> {
    Router::new()
        .route("/", get(handlers::health_check))
        .route("/chat", post(handlers::handle_chat))
        .route("/tools", get(handlers::handle_list_tools))
}
