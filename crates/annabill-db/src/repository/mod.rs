//! # Repository Module
//!
//! Database repository implementations for AnnaBill.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Terminal command                                                       │
//! │       │                                                                 │
//! │       │  db.bills().save_bill(&new_bill)                                │
//! │       ▼                                                                 │
//! │  BillRepository                                                         │
//! │  ├── next_bill_number(&self, date)                                      │
//! │  ├── save_bill(&self, new_bill)                                         │
//! │  ├── get_by_id / get_by_number                                          │
//! │  └── bills_for_date / daily_sales                                       │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`bill::BillRepository`] - Bill numbering, persistence and history
//! - [`settings::SettingsRepository`] - Key/value device settings

pub mod bill;
pub mod settings;
