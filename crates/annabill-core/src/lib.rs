//! # annabill-core: Pure Billing Logic for AnnaBill
//!
//! Everything a counter needs to turn menu taps into a printed bill, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        AnnaBill Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI shell (menu grid, cart)                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             annabill-terminal (checkout, printing)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ annabill-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  menu   │ │ pricing │ │  order  │ │ receipt │ │  bill_  │  │   │
//! │  │   │ catalog │ │ totals  │ │ builder │ │ ESC/POS │ │ number  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO PRINTER • NO CLOCK                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 annabill-db (SQLite bill store)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MenuItem, OrderLine, Bill, etc.)
//! - [`money`] - Money in paise with integer arithmetic
//! - [`menu`] - Menu catalog and add-on lookup
//! - [`pricing`] - Line totals, order totals, display strings
//! - [`order`] - Immutable order builder
//! - [`bill_number`] - `{PREFIX}-{YYYYMMDD}-{seq}` identifiers
//! - [`receipt`] - 32-column receipt layout for printer and preview
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use annabill_core::menu::Menu;
//! use annabill_core::order::Order;
//! use annabill_core::types::Portion;
//!
//! let menu = Menu::default();
//! let biryani = menu.item("chicken_biryani").unwrap();
//! let raita = menu.add_on("raita").unwrap().select(1);
//!
//! let order = Order::new().add_item(biryani, Some(Portion::Full), vec![raita]);
//! assert_eq!(order.total().rupees(), 200);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bill_number;
pub mod error;
pub mod menu;
pub mod money;
pub mod order;
pub mod pricing;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bill_number::BillNumber;
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use order::Order;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix used for bill numbers when none is configured.
pub const DEFAULT_BILL_PREFIX: &str = "AB";

/// Shop name printed on receipts when none is configured.
pub const DEFAULT_SHOP_NAME: &str = "AnnaBill";

/// Currency symbol for rupee amounts.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Guards against a mistyped quantity (100 instead of 10) at the counter.
pub const MAX_LINE_QUANTITY: i64 = 99;

/// Maximum number of lines on a single order.
pub const MAX_ORDER_LINES: usize = 50;
