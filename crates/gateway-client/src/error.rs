//! Error type surfaced to gateway callers.
//!
//! Every failure carries a human-readable message suitable for direct
//! display; callers are not expected to retry.

use reqwest::StatusCode;
use serde::Deserialize;

/// Uniform gateway failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The request never produced an HTTP response.
    #[error("request failed: {message}")]
    Transport {
        /// Human-readable failure description.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("server rejected the request ({status}): {message}")]
    Api {
        /// HTTP status code returned by the server.
        status: u16,
        /// Message extracted from the error envelope, or the status text.
        message: String,
    },

    /// The login-or-register upsert could not establish a session.
    #[error("authentication failed: {message}")]
    AuthBackend {
        /// Human-readable failure description.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("unexpected response: {message}")]
    Decode {
        /// Human-readable failure description.
        message: String,
    },
}

impl GatewayError {
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub(crate) fn auth_backend(message: impl Into<String>) -> Self {
        Self::AuthBackend {
            message: message.into(),
        }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// HTTP status of an [`GatewayError::Api`] failure, if that is what this
    /// is.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: Option<String>,
}

/// Normalise a non-success response body into an [`GatewayError::Api`].
///
/// The server's envelope carries `{success: false, message}`; anything else
/// (proxies, crashes) falls back to the status text.
pub(crate) fn api_error(status: StatusCode, body: &[u8]) -> GatewayError {
    let message = serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        });
    GatewayError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use rstest::rstest;

    use super::{GatewayError, api_error};

    #[rstest]
    fn envelope_message_is_extracted() {
        let error = api_error(
            StatusCode::NOT_FOUND,
            br#"{"success": false, "message": "complaint not found", "code": "not_found"}"#,
        );
        assert_eq!(
            error,
            GatewayError::Api {
                status: 404,
                message: "complaint not found".into()
            }
        );
    }

    #[rstest]
    #[case(b"" as &[u8])]
    #[case(b"<html>bad gateway</html>")]
    #[case(br#"{"unexpected": true}"#)]
    fn unparseable_bodies_fall_back_to_status_text(#[case] body: &[u8]) {
        let error = api_error(StatusCode::BAD_GATEWAY, body);
        assert_eq!(error.status(), Some(502));
        assert_eq!(
            error,
            GatewayError::Api {
                status: 502,
                message: "Bad Gateway".into()
            }
        );
    }
}
