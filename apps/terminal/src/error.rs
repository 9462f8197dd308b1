//! # API Error Type
//!
//! Unified error type for terminal commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Rodeo Ledger                           │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  Result<T, ApiError>                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Shop API error? ─── ClientError::FetchFailed("...") ──┐                │
//! │         │                                              │                │
//! │         ▼                                              ▼                │
//! │  Business rule? ──── CoreError::StockInsufficient ─── ApiError          │
//! │         │                                              │                │
//! │         ▼                                              ▼                │
//! │  Success                            blocking → alert, exit 1            │
//! │                                     transient → inline banner           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `message` is always the Korean text the cashier sees.

use serde::Serialize;

use rodeo_client::ClientError;
use rodeo_core::CoreError;

use crate::state::ConfigError;

/// Error returned from terminal commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "재고 부족: Pod A의 현재 재고는 3개이나, 5개를 판매하려고 합니다."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Message shown to the cashier
    pub message: String,
}

/// Error codes for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No credential, or the server rejected it
    AuthRequired,

    /// Login refused
    InvalidCredentials,

    /// Input validation failed
    ValidationError,

    /// Product unknown to the catalog
    NotFound,

    /// Draft would exceed stock
    InsufficientStock,

    /// A read from the shop API failed
    FetchFailed,

    /// A write to the shop API failed
    PersistenceFailed,

    /// The shop API answered with an unexpected shape
    MalformedResponse,

    /// Destructive action attempted without confirmation
    ConfirmationRequired,

    /// A commit or delete is already running
    Busy,

    /// Bad configuration file or environment
    ConfigError,

    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Blocking errors interrupt the cashier (alert); the rest show as an
    /// inline banner above whatever was already on screen.
    pub fn is_blocking(&self) -> bool {
        !matches!(
            self.code,
            ErrorCode::FetchFailed | ErrorCode::MalformedResponse
        )
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        let code = match err {
            CoreError::ProductNotFound(_) => ErrorCode::NotFound,
            CoreError::StockInsufficient { .. } => ErrorCode::InsufficientStock,
            CoreError::EmptyTransaction
            | CoreError::InvalidAmount
            | CoreError::MissingCardCompany
            | CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, message)
    }
}

/// Converts shop API errors to API errors.
impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        if err.is_auth() {
            tracing::info!("Session missing or expired, login required");
        }
        match err {
            ClientError::Core(e) => e.into(),
            ClientError::AuthRequired => ApiError::new(ErrorCode::AuthRequired, err.to_string()),
            ClientError::InvalidCredentials(message) => {
                ApiError::new(ErrorCode::InvalidCredentials, message)
            }
            ClientError::FetchFailed(message) => ApiError::new(ErrorCode::FetchFailed, message),
            ClientError::PersistenceFailed(message) => {
                ApiError::new(ErrorCode::PersistenceFailed, message)
            }
            ClientError::MalformedResponse(ref detail) => {
                tracing::error!(detail = %detail, "Shop API returned an unexpected payload");
                ApiError::new(ErrorCode::MalformedResponse, err.to_string())
            }
            ClientError::InvalidConfig(_) => ApiError::new(ErrorCode::ConfigError, err.to_string()),
            ClientError::TokenStore(ref detail) => {
                tracing::error!(detail = %detail, "Token store failed");
                ApiError::new(ErrorCode::Internal, err.to_string())
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rodeo_core::ValidationError;

    #[test]
    fn test_stock_error_keeps_korean_message() {
        let err: ApiError = CoreError::StockInsufficient {
            product: "Pod A".into(),
            available: 3,
            already_added: 2,
            requested: 2,
        }
        .into();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("최대 1개만 추가할 수 있습니다"));
        assert!(err.is_blocking());
    }

    #[test]
    fn test_client_core_error_unwraps() {
        let err: ApiError = ClientError::from(ValidationError::IncompleteItem).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "상품과 수량을 모두 입력해주세요.");
    }

    #[test]
    fn test_fetch_failure_is_transient() {
        let err: ApiError = ClientError::FetchFailed("재고 정보를 불러오는데 실패했습니다.".into()).into();
        assert_eq!(err.code, ErrorCode::FetchFailed);
        assert!(!err.is_blocking());
    }

    #[test]
    fn test_serializes_screaming_code() {
        let err = ApiError::new(ErrorCode::AuthRequired, "인증이 필요합니다. 다시 로그인해주세요.");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "AUTH_REQUIRED");
    }
}
