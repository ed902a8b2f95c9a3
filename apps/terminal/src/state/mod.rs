//! # State Module
//!
//! Application state for the counter terminal.
//!
//! Each concern gets its own state type, and commands take exactly the
//! pieces they need.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Terminal State                                 │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌────────────┐  │
//! │  │   DbState    │  │  OrderState  │  │ ConfigState  │  │ Printer-   │  │
//! │  │              │  │              │  │  (RwLock)    │  │ State<T>   │  │
//! │  │ SqlitePool   │  │ Arc<Mutex<   │  │ shop name    │  │ tokio      │  │
//! │  │ (thread-safe)│  │   Order>>    │  │ bill prefix  │  │ Mutex      │  │
//! │  │              │  │ + checkout   │  │ auto print   │  │            │  │
//! │  │              │  │   gate       │  │              │  │            │  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod order;
mod printer;

pub use config::{
    ConfigState, SharedConfig, ENV_AUTO_PRINT, ENV_BILL_PREFIX, ENV_PRINTER_ADDR, ENV_SHOP_NAME,
};
pub use db::DbState;
pub use order::OrderState;
pub use printer::PrinterState;
