//! # Order State
//!
//! The order being built at the counter.
//!
//! ## Thread Safety
//! The order is an immutable value behind `Arc<Mutex<T>>`. Every change
//! computes a new `Order` and swaps it in, so a reader never sees a half
//! applied edit. The lock is only held for that swap.
//!
//! Checkout additionally takes an async gate so two checkouts never
//! interleave their save-then-print sequences.
//!
//! ## Order Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order State Operations                               │
//! │                                                                         │
//! │  Frontend Action          Command                  Order Change         │
//! │  ───────────────          ───────                  ────────────         │
//! │                                                                         │
//! │  Tap Menu Item ─────────► add_item() ────────────► add_item / merge    │
//! │                                                                         │
//! │  Stepper +/- ───────────► update_quantity() ─────► qty = n (≤0 removes)│
//! │                                                                         │
//! │  Swipe Line ────────────► remove_line() ─────────► line removed        │
//! │                                                                         │
//! │  Parcel Toggle ─────────► set_order_type() ──────► order_type          │
//! │                                                                         │
//! │  Generate Bill ─────────► generate_bill() ───────► billed lines removed│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use annabill_core::order::Order;

/// Shared order state.
#[derive(Debug, Clone, Default)]
pub struct OrderState {
    order: Arc<Mutex<Order>>,
    checkout: Arc<tokio::sync::Mutex<()>>,
}

impl OrderState {
    /// Creates state holding an empty order.
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Order> {
        // An order is replaced whole, so a poisoned lock still holds a
        // consistent value.
        self.order.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of the current order.
    pub fn snapshot(&self) -> Order {
        self.guard().clone()
    }

    /// Reads the order without copying it.
    pub fn with_order<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Order) -> R,
    {
        f(&self.guard())
    }

    /// Replaces the order with `f(current)` and returns the new order.
    ///
    /// When `f` fails the order is left untouched.
    pub fn update<F, E>(&self, f: F) -> Result<Order, E>
    where
        F: FnOnce(&Order) -> Result<Order, E>,
    {
        let mut guard = self.guard();
        let next = f(&guard)?;
        *guard = next.clone();
        Ok(next)
    }

    /// Starts over with an empty order.
    pub fn reset(&self) -> Order {
        let mut guard = self.guard();
        *guard = guard.clear();
        guard.clone()
    }

    /// Removes a saved bill's lines from the order and returns what is left.
    ///
    /// Compared under the lock, so lines added while the bill was being
    /// saved are kept for the next checkout.
    pub fn settle(&self, billed: &Order) -> Order {
        let mut guard = self.guard();
        *guard = guard.without_billed(billed);
        guard.clone()
    }

    /// Waits for any checkout in progress to finish.
    pub async fn checkout_gate(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.checkout.lock().await
    }
}
