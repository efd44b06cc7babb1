//! Shared response envelope.
//!
//! Every successful response is `{ "success": true, "message"?: ..., ...payload }`.
//! Payloads are small named structs whose fields become top-level keys,
//! e.g. `ProjectBody { project }` serializes as `{"success":true,"project":{..}}`.

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            message: None,
            payload,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

pub type ApiJson<T> = Json<Envelope<T>>;

/// Payload of a successful delete.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

/// `200 OK` with `payload` in the envelope.
pub fn ok<T: Serialize>(payload: T) -> ApiJson<T> {
    Json(Envelope::ok(payload))
}

/// `201 Created` with `payload` in the envelope.
pub fn created<T: Serialize>(payload: T) -> (StatusCode, ApiJson<T>) {
    (StatusCode::CREATED, Json(Envelope::ok(payload)))
}
