use thiserror::Error;

/// Failures talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {}", message.as_deref().unwrap_or(body.as_str()))]
    Status {
        status: u16,
        /// Human-readable message the backend put in the error body, if any
        message: Option<String>,
        body: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// Build a status error from a raw response body.
    pub fn from_body(status: u16, body: String) -> Self {
        ApiError::Status {
            status,
            message: extract_server_message(&body),
            body,
        }
    }

    /// Status error carrying a known message, mostly for tests and in-memory stores.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        ApiError::Status {
            status,
            body: message.clone(),
            message: Some(message),
        }
    }

    /// Message the backend wants shown to the user, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Pull the user-facing message out of an error body: the `message` field,
/// then `error`, then a body that is just a JSON string.
pub fn extract_server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = match &value {
        serde_json::Value::Object(fields) => ["message", "error"]
            .iter()
            .filter_map(|key| fields.get(*key))
            .find_map(|field| field.as_str()),
        serde_json::Value::String(text) => Some(text.as_str()),
        _ => None,
    }?;

    let message = message.trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}
