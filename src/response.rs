//! Success envelopes: `{message, data}` for writes, `{message}` for deletes.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    pub data: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

pub type Reply<T> = (StatusCode, Json<T>);

pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> Reply<Envelope<T>> {
    (
        StatusCode::CREATED,
        Json(Envelope {
            message: message.into(),
            data,
        }),
    )
}

pub fn updated<T: Serialize>(message: impl Into<String>, data: T) -> Reply<Envelope<T>> {
    (
        StatusCode::OK,
        Json(Envelope {
            message: message.into(),
            data,
        }),
    )
}

pub fn deleted(message: impl Into<String>) -> Reply<MessageBody> {
    (
        StatusCode::NO_CONTENT,
        Json(MessageBody {
            message: message.into(),
        }),
    )
}
