use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use super::types::*;
use crate::error::TurnError;
use crate::orchestrator::Orchestrator;

type ApiError = (StatusCode, Json<serde_json::Value>);

pub async fn health_check() -> &'static str {
    "WebGPT API is running"
}

pub async fn handle_list_tools(State(orchestrator): State<Arc<Orchestrator>>) -> Json<ListToolsResponse> {
    Json(ListToolsResponse {
        tools: orchestrator.registry().get_tools(),
    })
}

pub async fn handle_chat(
    State(orchestrator): State<Arc<Orchestrator>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if req.messages.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "messages cannot be empty" })),
        ));
    }

    info!(messages = req.messages.len(), "chat request");

    match orchestrator.get_response(&req.messages).await {
        Ok(content) => Ok(Json(ChatResponse { content })),
        Err(e) => {
            error!("Turn failed: {}", e);
            Err((status_for(&e), Json(json!({ "error": e.to_string() }))))
        }
    }
}

fn status_for(err: &TurnError) -> StatusCode {
    match err {
        TurnError::ToolExecution { .. } | TurnError::Registry(_) => StatusCode::INTERNAL_SERVER_ERROR,
        TurnError::CompletionService(_)
        | TurnError::UnknownTool(_)
        | TurnError::ArgumentParse { .. }
        | TurnError::ProtocolViolation(_) => StatusCode::BAD_GATEWAY,
    }
}
