//! # Error Types
//!
//! Domain-specific error types for annabill-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  annabill-core errors (this file)                                      │
//! │  ├── CoreError        - Catalog lookups, bill number parsing           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  annabill-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  annabill-terminal errors                                              │
//! │  ├── PrintError       - Printer transport failures                     │
//! │  └── ApiError         - What the UI shell sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → UI           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing, order building and receipt formatting never fail. Operations on
//! an unknown order line are no-ops, so nothing here describes them.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Menu item id is not in the catalog.
    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    /// Add-on id is not in the catalog.
    #[error("Add-on not found: {0}")]
    AddOnNotFound(String),

    /// Add-on exists but cannot be attached to this menu item.
    ///
    /// ## When This Occurs
    /// - "Extra Chicken" picked for a Mutton Biryani
    /// - Any add-on picked for an item with `has_add_ons = false`
    #[error("Add-on {add_on_id} is not available for {menu_item_id}")]
    AddOnNotApplicable {
        add_on_id: String,
        menu_item_id: String,
    },

    /// Bill number string does not match `{PREFIX}-{YYYYMMDD}-{seq}`.
    #[error("Invalid bill number '{value}': {reason}")]
    InvalidBillNumber { value: String, reason: String },

    /// Order has more lines than allowed.
    #[error("Order cannot have more than {max} lines")]
    OrderTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before an order or bill is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., lowercase bill prefix).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Checkout was attempted with nothing on the order.
    #[error("Order is empty")]
    EmptyOrder,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
