//! Uniform response envelope: every payload carries a `success` flag and an
//! optional human-readable message alongside the data.

use serde::{Deserialize, Serialize};

/// Wrapper serialised around every successful response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Successful envelope carrying `data` and no message.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Successful envelope carrying both a message and `data`.
    pub fn message_with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// Successful envelope with only a message, for operations that return
    /// no resource representation.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Envelope;
    use serde_json::json;

    #[test]
    fn data_envelope_omits_message() {
        let rendered =
            serde_json::to_value(Envelope::data(json!({"id": 7}))).expect("serialise envelope");
        assert_eq!(rendered, json!({"success": true, "data": {"id": 7}}));
    }

    #[test]
    fn message_envelope_omits_data() {
        let rendered =
            serde_json::to_value(Envelope::message("complaint deleted")).expect("serialise");
        assert_eq!(
            rendered,
            json!({"success": true, "message": "complaint deleted"})
        );
    }
}
