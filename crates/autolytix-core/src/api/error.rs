use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Detected locally, before any request was sent.
    #[error("Session expired - please log in again")]
    TokenExpired,

    #[error("Unauthorized - token may be expired")]
    Unauthorized(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The server could not be reached at all.
    #[error("Offline - could not reach the server: {0}")]
    Offline(String),

    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            400 | 422 => ApiError::BadRequest(truncated),
            401 => ApiError::Unauthorized(truncated),
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            code => ApiError::UnexpectedStatus {
                status: code,
                body: truncated,
            },
        }
    }

    /// Classify a transport failure. Connection failures and timeouts mean
    /// the server was never reached.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            ApiError::Offline(err.to_string())
        } else {
            ApiError::NetworkError(err)
        }
    }

    /// HTTP status behind this error. Offline maps to 0; local and decoding
    /// failures have none.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest(_) => Some(400),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::AccessDenied(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::RateLimited => Some(429),
            ApiError::ServerError(_) => Some(500),
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            ApiError::Offline(_) => Some(0),
            ApiError::TokenExpired | ApiError::NetworkError(_) | ApiError::InvalidResponse(_) => None,
        }
    }

    /// Whether the session was (or should be) torn down because of this error.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::TokenExpired | ApiError::Unauthorized(_))
    }

    /// The `mensaje` the backend put in an error body, if any.
    pub fn server_message(&self) -> Option<String> {
        let body = match self {
            ApiError::BadRequest(body)
            | ApiError::Unauthorized(body)
            | ApiError::AccessDenied(body)
            | ApiError::NotFound(body)
            | ApiError::ServerError(body)
            | ApiError::UnexpectedStatus { body, .. } => body,
            _ => return None,
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get("mensaje")?
            .as_str()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }
}
