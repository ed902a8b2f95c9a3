//! # API Error Type
//!
//! Unified error type for terminal commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Error Flow to the UI Shell                          │
//! │                                                                         │
//! │  annabill-core         annabill-db           printer                    │
//! │  ┌────────────┐        ┌────────────┐        ┌────────────┐             │
//! │  │ CoreError  │        │  DbError   │        │ PrintError │             │
//! │  └─────┬──────┘        └─────┬──────┘        └─────┬──────┘             │
//! │        │                     │                     │                    │
//! │        └─────────────────────┼─────────────────────┘                    │
//! │                              ▼                                          │
//! │                   ┌─────────────────────┐                               │
//! │                   │ ApiError            │                               │
//! │                   │ { code, message }   │  ──► serialized to the shell │
//! │                   └─────────────────────┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Checkout maps a failed save to `BILL_SAVE_FAILED` explicitly, since the
//! cashier must know the order was kept.

use annabill_core::{CoreError, ValidationError};
use annabill_db::DbError;
use serde::Serialize;
use ts_rs::TS;

use crate::printer::PrintError;

/// API error returned from commands.
///
/// ## Serialization
/// This is what the UI shell receives when a command fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Bill not found: AB-20241115-007"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Checkout could not store the bill; the order is unchanged
    BillSaveFailed,

    /// Printer accepted the connection but the job failed
    PrintFailed,

    /// No printer connected or reachable
    PrinterUnavailable,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates a bill save error from the underlying database failure.
    pub fn bill_save_failed(err: &DbError) -> Self {
        tracing::error!("Bill save failed: {}", err);
        ApiError::new(
            ErrorCode::BillSaveFailed,
            "Failed to save bill. Please try again.",
        )
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConstraintViolation { message } => {
                tracing::error!("Constraint violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid value")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            err @ DbError::CorruptRecord { .. } => {
                tracing::error!("{}", err);
                ApiError::new(ErrorCode::DatabaseError, "Stored bill could not be read")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MenuItemNotFound(id) => ApiError::not_found("Menu item", &id),
            CoreError::AddOnNotFound(id) => ApiError::not_found("Add-on", &id),
            err @ CoreError::AddOnNotApplicable { .. } => ApiError::validation(err.to_string()),
            err @ CoreError::InvalidBillNumber { .. } => ApiError::validation(err.to_string()),
            err @ CoreError::OrderTooLarge { .. } => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts printer errors to API errors.
impl From<PrintError> for ApiError {
    fn from(err: PrintError) -> Self {
        if err.is_unavailable() {
            return ApiError::new(ErrorCode::PrinterUnavailable, err.to_string());
        }
        match err {
            PrintError::InvalidConfig(message) => ApiError::validation(message),
            other => ApiError::new(ErrorCode::PrintFailed, other.to_string()),
        }
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

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::not_found("Bill", "AB-20241115-007");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Bill not found: AB-20241115-007");

        let json = serde_json::to_value(ApiError::bill_save_failed(&DbError::PoolExhausted)).unwrap();
        assert_eq!(json["code"], "BILL_SAVE_FAILED");
    }

    #[test]
    fn test_core_error_mapping() {
        let err = ApiError::from(CoreError::MenuItemNotFound("dosa".to_string()));
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = ApiError::from(CoreError::Validation(ValidationError::EmptyOrder));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Order is empty");
    }

    #[test]
    fn test_print_error_mapping() {
        assert_eq!(
            ApiError::from(PrintError::NotConnected).code,
            ErrorCode::PrinterUnavailable
        );
        assert_eq!(
            ApiError::from(PrintError::ReconnectExhausted { attempts: 3 }).code,
            ErrorCode::PrinterUnavailable
        );
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        assert_eq!(ApiError::from(PrintError::Io(io)).code, ErrorCode::PrintFailed);
        assert_eq!(
            ApiError::from(PrintError::InvalidConfig("bad".to_string())).code,
            ErrorCode::ValidationError
        );
    }

    #[test]
    fn test_database_errors_hide_details() {
        let err = ApiError::from(DbError::QueryFailed("no such table: bills".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("bills"));
    }
}
