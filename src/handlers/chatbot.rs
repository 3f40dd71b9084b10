use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    services::genai::ChatTurn,
    state::AppState,
};

/// The request payload for a chatbot exchange.
#[derive(Deserialize, Debug)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// The chatbot's reply.
#[derive(Serialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Relays a chat exchange to the generative-AI upstream.
#[axum::debug_handler]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatReply>> {
    tracing::debug!("💬 Chatbot request ({} history turns)", payload.history.len());

    let reply = state
        .genai
        .generate(&payload.message, &payload.history)
        .await?;

    Ok(Json(ChatReply { reply }))
}
