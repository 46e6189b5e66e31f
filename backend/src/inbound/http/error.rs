//! Maps domain errors onto HTTP status codes and the JSON error envelope.
//!
//! Internal failures are redacted before they reach the wire; the original
//! message is logged server-side instead.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::{Map, Value, json};
use tracing::error;

use crate::domain::{Error, ErrorCode};

/// Result alias for handler functions.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn render(code: ErrorCode, message: &str, details: Option<&Value>) -> Value {
    let mut body = Map::new();
    body.insert("success".into(), Value::Bool(false));
    body.insert("message".into(), Value::String(message.to_owned()));
    body.insert("code".into(), json!(code));
    if let Some(details) = details {
        body.insert("details".into(), details.clone());
    }
    Value::Object(body)
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(code = ?self.code(), message = self.message(), "internal error");
            render(self.code(), "internal server error", None)
        } else {
            render(self.code(), self.message(), self.details())
        };
        HttpResponse::build(status).json(body)
    }
}
