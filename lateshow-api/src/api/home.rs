//! Landing route

use axum::Json;
use serde::Serialize;

/// `{"message": "..."}` body shared by the landing page and delete confirmations
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// GET /
pub async fn home() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the Late Show API"))
}
