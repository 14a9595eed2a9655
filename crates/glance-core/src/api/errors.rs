use crate::errors::GlanceError;

/// Error communicating with the telemetry service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid service URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Request failed: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    #[error("Service returned HTTP {status} for method '{method}'")]
    ServiceStatus { method: &'static str, status: u16 },

    #[error("Malformed response for method '{method}': {message}")]
    MalformedResponse {
        method: &'static str,
        message: String,
    },

    #[error("Response for method '{method}' has no entry for session '{session_id}'")]
    MissingSession {
        method: &'static str,
        session_id: String,
    },
}

impl ApiError {
    /// Map a payload-shape error for `method` onto the API error surface.
    pub(crate) fn from_payload(method: &'static str, error: PayloadError) -> Self {
        match error {
            PayloadError::MissingSession { session_id } => ApiError::MissingSession {
                method,
                session_id,
            },
            other => ApiError::MalformedResponse {
                method,
                message: other.to_string(),
            },
        }
    }
}

impl GlanceError for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidUrl { .. } => "API_INVALID_URL",
            ApiError::Transport { .. } => "API_TRANSPORT_FAILURE",
            ApiError::ServiceStatus { .. } => "API_SERVICE_STATUS",
            ApiError::MalformedResponse { .. } => "API_MALFORMED_RESPONSE",
            ApiError::MissingSession { .. } => "API_MISSING_SESSION",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, ApiError::InvalidUrl { .. })
    }
}

/// Shape error produced while interpreting a decoded JSON payload.
///
/// Distinct from [`ApiError`] so the parse functions in [`super::types`]
/// stay independent of any particular remote method name.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("expected a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("entry '{key}' is neither a session record nor a notice string")]
    UnexpectedEntry { key: String },

    #[error("invalid session record '{key}': {message}")]
    InvalidRecord { key: String, message: String },

    #[error("no entry for session '{session_id}'")]
    MissingSession { session_id: String },

    #[error("payload contains no name list")]
    MissingNames,
}
