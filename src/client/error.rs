use reqwest::StatusCode;
use thiserror::Error;

use crate::error::ErrorResponse;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type alias for session guard operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Maximum length for raw response bodies carried in errors
const MAX_ERROR_BODY_LENGTH: usize = 200;

impl ClientError {
    /// Classify a non-success response.
    ///
    /// The server's `{message}` body is preferred; anything else is carried
    /// truncated.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.message)
            .unwrap_or_else(|_| truncate(body));
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            _ => ClientError::Rejected {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// The server refused the credential itself (401 or 403).
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_) | ClientError::Forbidden(_))
    }

    /// The server answered with any non-success status.
    pub fn is_server_rejection(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthorized(_) | ClientError::Forbidden(_) | ClientError::Rejected { .. }
        )
    }

    /// The request never produced a usable answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::InvalidResponse(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::InvalidResponse(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

fn truncate(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}
