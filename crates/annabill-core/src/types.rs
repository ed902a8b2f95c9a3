//! # Domain Types
//!
//! Core domain types used throughout AnnaBill.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Catalog (configured)           Order (in memory)        Bill (stored)  │
//! │  ┌─────────────────┐           ┌─────────────────┐     ┌─────────────┐ │
//! │  │    MenuItem     │──copy────►│    OrderLine    │────►│    Bill     │ │
//! │  │  full/half price│           │  base_price     │     │ bill_number │ │
//! │  └─────────────────┘           │  portion, qty   │     │ items       │ │
//! │  ┌─────────────────┐           │  add_ons ───┐   │     │ subtotal    │ │
//! │  │ AddOnDefinition │──copy────►│ OrderLineAddOn  │     │ total       │ │
//! │  │  applicable_to  │           └─────────────────┘     │ created_at  │ │
//! │  └─────────────────┘                                   └─────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Price Snapshots
//! Prices are copied from the catalog into the order line when the item is
//! added. Changing the menu later never changes an open order or a saved bill.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::pricing;

// =============================================================================
// Category
// =============================================================================

/// Menu category, used for grouping in the menu grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Biryani,
    Beverages,
    Snacks,
}

// =============================================================================
// Order Type
// =============================================================================

/// Whether the order is eaten in or packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    /// Takeaway.
    Parcel,
    /// Eaten at the outlet. New orders start here.
    #[default]
    DineIn,
}

impl OrderType {
    /// Stored and serialized form (`parcel` / `dine-in`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderType::Parcel => "parcel",
            OrderType::DineIn => "dine-in",
        }
    }

    /// Tag printed on the receipt.
    pub const fn receipt_tag(&self) -> &'static str {
        match self {
            OrderType::Parcel => "[ PARCEL ]",
            OrderType::DineIn => "[ DINE-IN ]",
        }
    }
}

// =============================================================================
// Portion
// =============================================================================

/// Portion size for items that come in full and half plates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Portion {
    Full,
    Half,
}

impl Portion {
    /// Label used in display names: `Chicken Biryani (Half)`.
    pub const fn label(&self) -> &'static str {
        match self {
            Portion::Full => "Full",
            Portion::Half => "Half",
        }
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// A sellable item in the menu catalog.
///
/// `half_price` is only meaningful when `has_portions` is set; the
/// validation module rejects catalogs that break this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItem {
    /// Stable identifier (e.g. `chicken_biryani`).
    pub id: String,

    /// Name shown on the menu grid and the receipt.
    pub name: String,

    pub category: Category,

    /// Price of a full portion, or the only price.
    pub full_price: Money,

    /// Price of a half portion.
    pub half_price: Option<Money>,

    /// Whether the item is sold in full and half portions.
    pub has_portions: bool,

    /// Whether add-ons can be attached. Such items never merge into an
    /// existing order line.
    pub has_add_ons: bool,
}

impl MenuItem {
    /// Resolves the unit price for the chosen portion.
    ///
    /// Half portion uses `half_price` when present; everything else falls
    /// back to `full_price`.
    pub fn price_for(&self, portion: Option<Portion>) -> Money {
        match (portion, self.half_price) {
            (Some(Portion::Half), Some(half)) => half,
            _ => self.full_price,
        }
    }
}

// =============================================================================
// Add-ons
// =============================================================================

/// A priced extra offered with some menu items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddOnDefinition {
    pub id: String,
    pub name: String,
    pub price: Money,

    /// Menu item ids this add-on can be attached to.
    pub applicable_to: Vec<String>,
}

impl AddOnDefinition {
    /// Checks if this add-on can be attached to the given menu item.
    pub fn applies_to(&self, menu_item_id: &str) -> bool {
        self.applicable_to.iter().any(|id| id == menu_item_id)
    }

    /// Snapshots this add-on at the given quantity for an order line.
    pub fn select(&self, quantity: u32) -> OrderLineAddOn {
        OrderLineAddOn {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            quantity,
        }
    }
}

/// An add-on attached to an order line.
///
/// Quantity 0 means "not selected". The order builder strips such entries
/// so they never reach a bill or a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLineAddOn {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
}

// =============================================================================
// Order Line
// =============================================================================

/// One line on an order.
///
/// ## Merge Rule
/// ```text
/// add_item(Tea) ──► existing Tea line, no add-ons possible? ──► quantity += 1
///                              │
///                              └── otherwise ──► new line, quantity 1
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    /// Unique line identifier (UUID v4).
    pub id: String,

    /// Catalog id of the menu item this line was created from.
    pub menu_item_id: String,

    /// Item name at the time the line was created.
    pub name: String,

    pub category: Category,

    /// Chosen portion, if the item has portions.
    pub portion: Option<Portion>,

    /// Always at least 1 while the line exists.
    pub quantity: u32,

    /// Unit price for the chosen portion, captured at add time.
    pub base_price: Money,

    pub add_ons: Vec<OrderLineAddOn>,
}

impl OrderLine {
    /// See [`pricing::line_total`].
    #[inline]
    pub fn line_total(&self) -> Money {
        pricing::line_total(self)
    }

    /// See [`pricing::display_name`].
    #[inline]
    pub fn display_name(&self) -> String {
        pricing::display_name(self)
    }
}

// =============================================================================
// Bill
// =============================================================================

/// Everything needed to persist a bill. The store assigns number, id and
/// timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewBill {
    pub order_type: OrderType,
    pub items: Vec<OrderLine>,
    pub subtotal: Money,
    pub total: Money,
}

/// A persisted, immutable record of a completed order.
///
/// ## Lifecycle
/// ```text
/// Order ──► NewBill ──► BillRepository::save_bill ──► Bill
///                                                      │
///                           receipt::render_receipt ◄──┤
///                           receipt::render_preview ◄──┘
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bill {
    /// Store-assigned row id. `None` only for bills never persisted
    /// (e.g. the printer test page).
    pub id: Option<i64>,

    /// `{PREFIX}-{YYYYMMDD}-{seq:03}`, unique.
    pub bill_number: String,

    pub order_type: OrderType,

    /// Deep copy of the order lines at checkout.
    pub items: Vec<OrderLine>,

    /// Sum of line totals, unrounded.
    pub subtotal: Money,

    /// Subtotal rounded to whole rupees.
    pub total: Money,

    /// Local time of creation, with its UTC offset.
    #[ts(as = "String")]
    pub created_at: DateTime<FixedOffset>,
}

impl Bill {
    /// Calendar day the bill belongs to, in the outlet's local time.
    ///
    /// This is the day whose sequence the bill number was drawn from.
    pub fn business_date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Bill count and takings for one business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailySales {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub count: i64,
    pub total: Money,
}

// =============================================================================
// Settings
// =============================================================================

/// Outlet settings persisted on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct AppSettings {
    /// Printed in the receipt header.
    pub shop_name: String,

    /// Print automatically after a bill is saved.
    pub auto_print: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            shop_name: crate::DEFAULT_SHOP_NAME.to_string(),
            auto_print: true,
        }
    }
}

// =============================================================================
// Printer
// =============================================================================

/// A receipt printer the terminal can talk to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PrinterDevice {
    /// Stable identifier (MAC address, serial, or `host:port`).
    pub id: String,

    /// Friendly name shown in settings.
    pub name: String,

    /// Transport address (`host:port` for network printers).
    pub address: String,
}

/// Connection state shown in the UI status pill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PrinterStatus {
    pub connected: bool,

    /// Name of the connected (or last attempted) printer.
    pub name: Option<String>,

    /// Last connection or print error, cleared on success.
    pub error: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
