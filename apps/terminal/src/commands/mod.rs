//! # Commands Module
//!
//! Everything the UI shell can ask the terminal to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── order.rs    ◄─── Menu and order building
//! ├── bill.rs     ◄─── Checkout, reprint, preview, history
//! ├── printer.rs  ◄─── Printer scan, connect, test print
//! └── config.rs   ◄─── Outlet settings
//! ```
//!
//! ## State Injection
//! Commands are plain functions. Each declares only the state it needs:
//! ```rust,ignore
//! // Only needs the order
//! fn get_order(order: &OrderState) -> OrderResponse
//!
//! // Needs menu and order
//! fn add_item(menu: &Menu, order: &OrderState, request: AddItemRequest)
//!
//! // Checkout touches everything except the menu
//! async fn generate_bill(db: &DbState, order: &OrderState,
//!                        config: &SharedConfig, printer: &PrinterState<T>)
//! ```
//!
//! ## Error Handling
//! Commands that can fail return `Result<T, ApiError>`; the shell receives
//! `{ code, message }` (see `error.rs`).

pub mod bill;
pub mod config;
pub mod order;
pub mod printer;
