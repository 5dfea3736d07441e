use axum::{http::StatusCode, Json};

use crate::app::dto::MessageResponse;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse { message: "pong" })
}
