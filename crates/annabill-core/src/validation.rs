//! # Validation Module
//!
//! Input validation for values that come from the UI shell, settings, or
//! the menu configuration.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI shell                                                      │
//! │  └── Steppers never go below 1, empty cart disables "Generate Bill"    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Terminal commands (Rust)                                     │
//! │  └── THIS MODULE: quantity ranges, shop name, bill prefix, catalog     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE bill_number                                                │
//! │  └── CHECK order_type IN ('parcel', 'dine-in')                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::receipt::LINE_WIDTH;
use crate::types::{AddOnDefinition, MenuItem};
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest bill prefix accepted.
pub const MAX_BILL_PREFIX_LEN: usize = 8;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity set from a stepper or keypad.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
///
/// Zero and negatives are still meaningful to the order builder (they remove
/// the line); callers that want removal should call `remove_line` instead.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates an add-on quantity. Zero is allowed and means "not selected".
pub fn validate_add_on_quantity(qty: i64) -> ValidationResult<()> {
    if !(0..=MAX_LINE_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "add_on_quantity".to_string(),
            min: 0,
            max: MAX_LINE_QUANTITY,
        });
    }
    Ok(())
}

fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates the shop name printed in the receipt header.
///
/// ## Rules
/// - Must not be blank
/// - At most one receipt line wide
///
/// ## Example
/// ```rust
/// use annabill_core::validation::validate_shop_name;
///
/// assert!(validate_shop_name("AnnaBill").is_ok());
/// assert!(validate_shop_name("   ").is_err());
/// ```
pub fn validate_shop_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "shop_name".to_string(),
        });
    }

    if name.chars().count() > LINE_WIDTH {
        return Err(ValidationError::TooLong {
            field: "shop_name".to_string(),
            max: LINE_WIDTH,
        });
    }

    Ok(())
}

/// Validates a bill number prefix.
///
/// ## Rules
/// - 1 to 8 characters
/// - Uppercase ASCII letters and digits only, so the `-` separators of a
///   bill number stay unambiguous
///
/// ## Example
/// ```rust
/// use annabill_core::validation::validate_bill_prefix;
///
/// assert!(validate_bill_prefix("AB").is_ok());
/// assert!(validate_bill_prefix("a-b").is_err());
/// ```
pub fn validate_bill_prefix(prefix: &str) -> ValidationResult<()> {
    if prefix.is_empty() {
        return Err(ValidationError::Required {
            field: "bill_prefix".to_string(),
        });
    }

    if prefix.len() > MAX_BILL_PREFIX_LEN {
        return Err(ValidationError::TooLong {
            field: "bill_prefix".to_string(),
            max: MAX_BILL_PREFIX_LEN,
        });
    }

    if !prefix
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err(ValidationError::InvalidFormat {
            field: "bill_prefix".to_string(),
            reason: "must contain only uppercase letters and digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates one menu item from the configuration.
///
/// ## Rules
/// - id and name must not be blank
/// - prices must not be negative
/// - `half_price` only on items with portions
pub fn validate_menu_item(item: &MenuItem) -> ValidationResult<()> {
    if item.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "menu_item.id".to_string(),
        });
    }
    if item.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "menu_item.name".to_string(),
        });
    }

    validate_price("menu_item.full_price", item.full_price)?;

    if let Some(half) = item.half_price {
        if !item.has_portions {
            return Err(ValidationError::InvalidFormat {
                field: "menu_item.half_price".to_string(),
                reason: format!("{} has no portions", item.id),
            });
        }
        validate_price("menu_item.half_price", half)?;
    }

    Ok(())
}

/// Validates one add-on definition from the configuration.
pub fn validate_add_on(add_on: &AddOnDefinition) -> ValidationResult<()> {
    if add_on.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "add_on.id".to_string(),
        });
    }
    if add_on.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "add_on.name".to_string(),
        });
    }
    validate_price("add_on.price", add_on.price)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_add_on_quantity_allows_zero() {
        assert!(validate_add_on_quantity(0).is_ok());
        assert!(validate_add_on_quantity(2).is_ok());
        assert!(validate_add_on_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_shop_name() {
        assert!(validate_shop_name("Anna Mess").is_ok());
        assert!(validate_shop_name("").is_err());
        assert!(validate_shop_name(&"X".repeat(LINE_WIDTH + 1)).is_err());
    }

    #[test]
    fn test_validate_bill_prefix() {
        assert!(validate_bill_prefix("AB").is_ok());
        assert!(validate_bill_prefix("BP2").is_ok());
        assert!(validate_bill_prefix("").is_err());
        assert!(validate_bill_prefix("ab").is_err());
        assert!(validate_bill_prefix("A-B").is_err());
        assert!(validate_bill_prefix("ABCDEFGHI").is_err());
    }

    #[test]
    fn test_half_price_requires_portions() {
        let item = MenuItem {
            id: "tea".to_string(),
            name: "Tea".to_string(),
            category: Category::Beverages,
            full_price: Money::from_rupees(15),
            half_price: Some(Money::from_rupees(8)),
            has_portions: false,
            has_add_ons: false,
        };
        assert!(validate_menu_item(&item).is_err());

        let item = MenuItem {
            half_price: None,
            ..item
        };
        assert!(validate_menu_item(&item).is_ok());
    }
}
