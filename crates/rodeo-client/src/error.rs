//! # Client Error Types
//!
//! Errors raised at the HTTP collaborator boundary.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  reqwest::Error / HTTP status / bad JSON                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ClientError (this module) ← Categorized: auth, fetch, persist, schema │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (terminal app) ← Code + Korean message                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Cashier sees a blocking alert or an inline banner                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rodeo_core::{CoreError, ValidationError};
use thiserror::Error;

/// HTTP collaborator errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// No stored credential, or the server rejected it (401).
    ///
    /// ## When This Occurs
    /// - No `rodeo login` yet
    /// - Token expired; the stored token is discarded
    #[error("인증이 필요합니다. 다시 로그인해주세요.")]
    AuthRequired,

    /// Login rejected. Carries the server's message when it sent one.
    #[error("{0}")]
    InvalidCredentials(String),

    /// A read failed (network error or non-2xx status).
    #[error("{0}")]
    FetchFailed(String),

    /// A write failed. The message is the server's when it sent one.
    #[error("{0}")]
    PersistenceFailed(String),

    /// The server answered with a payload that does not fit the schema.
    #[error("서버 응답 형식이 올바르지 않습니다: {0}")]
    MalformedResponse(String),

    /// Client construction failed (bad base URL, TLS backend).
    #[error("클라이언트 설정 오류: {0}")]
    InvalidConfig(String),

    /// Reading or writing the token store failed.
    #[error("로그인 정보를 저장할 수 없습니다: {0}")]
    TokenStore(String),

    /// Business rule or input validation failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        ClientError::MalformedResponse(reason.into())
    }

    /// Whether the caller must sign in again.
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::AuthRequired)
    }

    /// Whether re-triggering the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::FetchFailed(_) | ClientError::PersistenceFailed(_)
        )
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Core(CoreError::Validation(err))
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert!(ClientError::AuthRequired.is_auth());
        assert!(!ClientError::AuthRequired.is_retryable());
        assert!(ClientError::FetchFailed("x".into()).is_retryable());
        assert!(ClientError::PersistenceFailed("x".into()).is_retryable());
        assert!(!ClientError::malformed("x").is_retryable());
    }

    #[test]
    fn test_validation_wraps_into_core() {
        let err: ClientError = ValidationError::required("메모 내용").into();
        assert_eq!(
            err,
            ClientError::Core(CoreError::Validation(ValidationError::required("메모 내용")))
        );
        assert_eq!(err.to_string(), "메모 내용을(를) 입력해주세요.");
    }
}
