//! # Validation Module
//!
//! Input validation for forms that reach the server.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  └── Types: numbers are numbers, dates are dates                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Required fields, ranges, lengths                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Server                                                       │
//! │  └── Its own constraints; failures come back as PersistenceFailed      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every check here runs before a request is built, so a failure never
//! costs a network round trip.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::ProductInput;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 100;
const MAX_MEMO_LEN: usize = 2_000;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// Must be positive. The upper bound is the product's stock, checked when
/// the line is added.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "수량".to_string(),
        });
    }

    Ok(())
}

/// Validates an inventory form before create/update.
///
/// ## Rules
/// - Name and category required, name at most 100 characters
/// - Price and stock quantity must not be negative
pub fn validate_product_input(input: &ProductInput) -> ValidationResult<()> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ValidationError::required("상품명"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "상품명".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    if input.category.trim().is_empty() {
        return Err(ValidationError::required("카테고리"));
    }

    if input.price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "가격".to_string(),
        });
    }

    if input.quantity < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "재고 수량".to_string(),
        });
    }

    Ok(())
}

/// Validates login credentials; both fields are required.
pub fn validate_credentials(username: &str, password: &str) -> ValidationResult<()> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::required("아이디와 비밀번호"));
    }
    Ok(())
}

/// Validates memo content and returns it trimmed.
pub fn validate_memo_content(content: &str) -> ValidationResult<String> {
    let content = content.trim();

    if content.is_empty() {
        return Err(ValidationError::required("메모 내용"));
    }

    if content.chars().count() > MAX_MEMO_LEN {
        return Err(ValidationError::TooLong {
            field: "메모 내용".to_string(),
            max: MAX_MEMO_LEN,
        });
    }

    Ok(content.to_string())
}

/// Parses a `YYYY-MM-DD` sale date.
pub fn parse_sale_date(input: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| ValidationError::invalid_format("판매 날짜", e.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn input(name: &str, category: &str, price: i64, quantity: i64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            category: category.to_string(),
            price: Money::from_won(price),
            quantity,
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(1_500).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_product_input() {
        assert!(validate_product_input(&input("Pod A", "코일팟", 5_000, 0)).is_ok());

        assert_eq!(
            validate_product_input(&input("  ", "코일팟", 5_000, 1)),
            Err(ValidationError::required("상품명"))
        );
        assert_eq!(
            validate_product_input(&input("Pod A", "", 5_000, 1)),
            Err(ValidationError::required("카테고리"))
        );
        assert!(validate_product_input(&input("Pod A", "코일팟", -1, 1)).is_err());
        assert!(validate_product_input(&input("Pod A", "코일팟", 0, -1)).is_err());
        assert!(validate_product_input(&input(&"가".repeat(101), "코일팟", 0, 1)).is_err());
    }

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials("admin", "secret").is_ok());
        assert!(validate_credentials("", "secret").is_err());
        assert!(validate_credentials("admin", "").is_err());
    }

    #[test]
    fn test_validate_memo_content() {
        assert_eq!(validate_memo_content("  발주 확인  ").unwrap(), "발주 확인");
        assert!(validate_memo_content("   ").is_err());
    }

    #[test]
    fn test_parse_sale_date() {
        assert_eq!(
            parse_sale_date("2024-05-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
        assert!(parse_sale_date("05/01/2024").is_err());
    }
}
