//! # Error Types
//!
//! Domain-specific error types for rodeo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rodeo-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations (stock, settlement)   │
//! │  └── ValidationError  - Missing or malformed input                     │
//! │                                                                         │
//! │  rodeo-client errors (separate crate)                                  │
//! │  └── ClientError      - AuthRequired, FetchFailed, PersistenceFailed   │
//! │                                                                         │
//! │  terminal app errors                                                   │
//! │  └── ApiError         - What the cashier sees (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Cashier                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Messages are Korean: they are shown to the shop staff as-is.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised while composing or settling a draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The draft references a product the catalog does not know.
    ///
    /// ## When This Occurs
    /// - Product was deleted after the catalog was loaded
    /// - A line item was built against a different catalog snapshot
    #[error("상품 정보를 찾을 수 없습니다: {0}")]
    ProductNotFound(String),

    /// Requested quantity exceeds the remaining stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Stock: 10, already in draft: 6
    ///      │
    ///      ▼
    /// add 5 ──► StockInsufficient { available: 10, already_added: 6, requested: 5 }
    ///      │
    ///      ▼
    /// "최대 4개만 추가할 수 있습니다."
    /// ```
    #[error("{}", stock_message(.product, .available, .already_added, .requested))]
    StockInsufficient {
        product: String,
        available: i64,
        already_added: i64,
        requested: i64,
    },

    /// Commit attempted with no line items.
    #[error("거래할 항목이 없습니다.")]
    EmptyTransaction,

    /// Commit attempted without a positive total amount.
    #[error("총 결제 금액을 입력해주세요.")]
    InvalidAmount,

    /// Card payment without a card issuer.
    #[error("카드 결제 시 카드사를 선택해주세요.")]
    MissingCardCompany,

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns how many more units could still be added, for stock errors.
    pub fn max_addable(&self) -> Option<i64> {
        match self {
            CoreError::StockInsufficient {
                available,
                already_added,
                ..
            } => Some(remaining(available, already_added)),
            _ => None,
        }
    }
}

fn remaining(available: &i64, already_added: &i64) -> i64 {
    (available - already_added).max(0)
}

fn stock_message(product: &str, available: &i64, already_added: &i64, requested: &i64) -> String {
    if *already_added == 0 {
        return format!(
            "재고 부족: {}의 현재 재고는 {}개이나, {}개를 판매하려고 합니다.",
            product, available, requested
        );
    }
    format!(
        "재고 부족: {}의 현재 재고는 {}개이며, 이미 {}개를 추가했습니다. 최대 {}개만 추가할 수 있습니다.",
        product,
        available,
        already_added,
        remaining(available, already_added)
    )
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These block the action before anything is sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field}을(를) 입력해주세요.")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field}은(는) 최대 {max}자까지 입력할 수 있습니다.")]
    TooLong { field: String, max: usize },

    /// The pending line has no product or no quantity.
    #[error("상품과 수량을 모두 입력해주세요.")]
    IncompleteItem,

    /// Value must be positive.
    #[error("{field}은(는) 0보다 커야 합니다.")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field}은(는) 0 이상이어야 합니다.")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid date, unknown payment method).
    #[error("{field} 형식이 올바르지 않습니다: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_error_reports_max_addable() {
        let err = CoreError::StockInsufficient {
            product: "Pod A".to_string(),
            available: 10,
            already_added: 6,
            requested: 5,
        };
        assert_eq!(err.max_addable(), Some(4));
        assert_eq!(
            err.to_string(),
            "재고 부족: Pod A의 현재 재고는 10개이며, 이미 6개를 추가했습니다. 최대 4개만 추가할 수 있습니다."
        );
    }

    #[test]
    fn test_stock_error_without_prior_lines() {
        let err = CoreError::StockInsufficient {
            product: "Pod A".to_string(),
            available: 10,
            already_added: 0,
            requested: 12,
        };
        assert_eq!(
            err.to_string(),
            "재고 부족: Pod A의 현재 재고는 10개이나, 12개를 판매하려고 합니다."
        );
        assert_eq!(err.max_addable(), Some(10));
    }

    #[test]
    fn test_max_addable_never_negative() {
        // Stock shrank below what the draft already holds.
        let err = CoreError::StockInsufficient {
            product: "Pod A".to_string(),
            available: 3,
            already_added: 5,
            requested: 1,
        };
        assert_eq!(err.max_addable(), Some(0));
        assert_eq!(CoreError::EmptyTransaction.max_addable(), None);
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("상품").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "상품을(를) 입력해주세요.");
    }
}
