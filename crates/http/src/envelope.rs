//! JSON envelope shared by every bookshelf response

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Outcome tag carried in the `status` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    /// The request was rejected (4xx)
    Fail,
    /// The server could not complete the request (5xx)
    Error,
}

impl Status {
    /// `fail` for client errors, `error` for everything else
    pub fn for_failure(code: StatusCode) -> Self {
        if code.is_client_error() {
            Status::Fail
        } else {
            Status::Error
        }
    }
}

/// `{status, message?, data?}` response body
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize = ()> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// Successful envelope carrying a data payload
    pub fn success(data: T) -> Self {
        Self {
            status: Status::Success,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Render with the given HTTP status code
    pub fn respond(self, code: StatusCode) -> Response {
        (code, Json(self)).into_response()
    }
}

impl Envelope<()> {
    /// Successful envelope with only a message
    pub fn acknowledged(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Failure envelope; the tag follows the status code class
    pub fn failure(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: Status::for_failure(code),
            message: Some(message.into()),
            data: None,
        }
    }
}
