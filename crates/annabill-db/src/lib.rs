//! # annabill-db: Bill Store for AnnaBill
//!
//! Local SQLite persistence through sqlx: saved bills, the per-day bill
//! counter, and device settings.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   annabill-terminal (checkout, reprint, reports)                        │
//! │          │                                                              │
//! │          │  db.bills().save_bill(&new_bill)                             │
//! │          ▼                                                              │
//! │   ┌──────────────────────────── annabill-db ─────────────────────────┐  │
//! │   │  Database ──► BillRepository      bills, daily_counter          │  │
//! │   │           └─► SettingsRepository  settings                      │  │
//! │   └──────────────────────────────────────────────────────────────────┘  │
//! │          │                                                              │
//! │          ▼                                                              │
//! │   SQLite file (WAL)                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Bill and settings repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use annabill_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/annabill.db")).await?;
//! let bill = db.bills().save_bill(&new_bill).await?;
//! println!("saved {}", bill.bill_number);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::bill::BillRepository;
pub use repository::settings::SettingsRepository;
