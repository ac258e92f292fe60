use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("HTTP error! status: {}, details: {body}", .status.as_u16())]
    Status { status: StatusCode, body: String },

    /// No response at all: connection refused, DNS, TLS, timeout.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Success status but the body is not JSON.
    #[error("invalid JSON in response: {0}")]
    Decode(#[source] reqwest::Error),

    /// The request could not be built before sending.
    #[error("invalid request: {0}")]
    Request(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Status,
    Transport,
    Decode,
    Request,
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Status { .. } => FailureKind::Status,
            ApiError::Transport(_) => FailureKind::Transport,
            ApiError::Decode(_) => FailureKind::Decode,
            ApiError::Request(_) => FailureKind::Request,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Wire shape of a failed call: `{"success": false, "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub success: bool,
    pub kind: FailureKind,
    pub message: String,
}

impl From<&ApiError> for Failure {
    fn from(err: &ApiError) -> Self {
        Failure {
            success: false,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
