//! # Bill Commands
//!
//! Checkout, reprint, preview and the day's history.
//!
//! ## Checkout (Save, Then Print)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  generate_bill                                                          │
//! │                                                                         │
//! │  1. Wait for the checkout gate (one checkout at a time)                 │
//! │  2. Empty order?  ──► VALIDATION_ERROR, nothing saved                   │
//! │  3. Save bill (number allocated in the same transaction)                │
//! │       └─ fails?   ──► BILL_SAVE_FAILED, order kept, nothing printed    │
//! │  4. Remove the billed lines (later additions stay)                      │
//! │  5. Auto-print on? Print the receipt                                    │
//! │       └─ fails?   ──► bill stays saved, printed = false,               │
//! │                       cashier retries with reprint_bill                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A saved bill is never rolled back because the printer failed, and a
//! reprint never allocates a new number.

use annabill_core::receipt::render_preview;
use annabill_core::{Bill, DailySales, NewBill, ValidationError};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::commands::order::OrderResponse;
use crate::error::ApiError;
use crate::printer::PrinterTransport;
use crate::state::{DbState, OrderState, PrinterState, SharedConfig};

/// Result of a checkout.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    /// The saved bill.
    pub bill: Bill,

    /// Whether the receipt reached the printer.
    pub printed: bool,

    /// Why printing failed, when it was attempted and failed.
    pub print_error: Option<String>,

    /// The order after checkout. Empty unless lines were added while the
    /// bill was being saved.
    pub order: OrderResponse,
}

/// Saves the current order as a bill and prints it.
///
/// ## Errors
/// - `VALIDATION_ERROR`: the order is empty
/// - `BILL_SAVE_FAILED`: the bill could not be stored; the order is kept
///
/// Print failures are not errors here: the bill is already saved, so the
/// response reports `printed: false` with the reason.
pub async fn generate_bill<T: PrinterTransport>(
    db: &DbState,
    order: &OrderState,
    config: &SharedConfig,
    printer: &PrinterState<T>,
) -> Result<CheckoutResponse, ApiError> {
    let _gate = order.checkout_gate().await;

    let current = order.snapshot();
    if current.is_empty() {
        return Err(ValidationError::EmptyOrder.into());
    }

    let new_bill = NewBill::from(&current);
    let bill = db
        .inner()
        .bills()
        .save_bill(&new_bill)
        .await
        .map_err(|e| ApiError::bill_save_failed(&e))?;

    info!(
        bill_number = %bill.bill_number,
        total = %bill.total,
        "Bill saved"
    );

    let remaining = order.settle(&current);
    if !remaining.is_empty() {
        info!(
            lines = remaining.items().len(),
            "Lines added during checkout kept for the next bill"
        );
    }
    let config = config.get();

    let (printed, print_error) = if config.auto_print {
        match printer.lock().await.print_bill(&bill, &config.shop_name).await {
            Ok(()) => (true, None),
            Err(e) => {
                warn!(bill_number = %bill.bill_number, error = %e, "Bill saved but not printed");
                (false, Some(e.to_string()))
            }
        }
    } else {
        (false, None)
    };

    Ok(CheckoutResponse {
        bill,
        printed,
        print_error,
        order: OrderResponse::from(&remaining),
    })
}

/// Prints a saved bill again.
///
/// ## Errors
/// - `NOT_FOUND`: no bill with that number
/// - `PRINTER_UNAVAILABLE` / `PRINT_FAILED`: the printer failed
pub async fn reprint_bill<T: PrinterTransport>(
    db: &DbState,
    config: &SharedConfig,
    printer: &PrinterState<T>,
    bill_number: &str,
) -> Result<Bill, ApiError> {
    info!(bill_number, "reprint_bill command");
    let bill = get_bill(db, bill_number).await?;
    let shop_name = config.get().shop_name;
    printer.lock().await.print_bill(&bill, &shop_name).await?;
    Ok(bill)
}

/// Plain-text receipt of a saved bill for the preview screen.
pub async fn preview_receipt(
    db: &DbState,
    config: &SharedConfig,
    bill_number: &str,
) -> Result<String, ApiError> {
    debug!(bill_number, "preview_receipt command");
    let bill = get_bill(db, bill_number).await?;
    Ok(render_preview(&bill, Some(&config.get().shop_name)))
}

/// Looks up a bill by number.
pub async fn get_bill(db: &DbState, bill_number: &str) -> Result<Bill, ApiError> {
    db.inner()
        .bills()
        .get_by_number(bill_number)
        .await?
        .ok_or_else(|| ApiError::not_found("Bill", bill_number))
}

/// Today's bills, newest first.
pub async fn todays_bills(db: &DbState) -> Result<Vec<Bill>, ApiError> {
    debug!("todays_bills command");
    Ok(db.inner().bills().todays_bills().await?)
}

/// Bills for any business date, newest first.
pub async fn bills_for_date(db: &DbState, date: NaiveDate) -> Result<Vec<Bill>, ApiError> {
    Ok(db.inner().bills().bills_for_date(date).await?)
}

/// Bill count and takings for `date` (today when omitted).
pub async fn daily_sales(db: &DbState, date: Option<NaiveDate>) -> Result<DailySales, ApiError> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    Ok(db.inner().bills().daily_sales(date).await?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::order::{add_item, set_order_type, AddItemRequest, AddOnPick};
    use crate::commands::test_support::fixture;
    use crate::error::ErrorCode;
    use annabill_core::{OrderType, Portion};

    fn biryani_with_raita() -> AddItemRequest {
        AddItemRequest {
            menu_item_id: "chicken_biryani".to_string(),
            portion: Some(Portion::Full),
            add_ons: vec![AddOnPick {
                add_on_id: "raita".to_string(),
                quantity: 1,
            }],
        }
    }

    fn tea() -> AddItemRequest {
        AddItemRequest {
            menu_item_id: "tea".to_string(),
            portion: None,
            add_ons: vec![],
        }
    }

    #[tokio::test]
    async fn test_checkout_saves_clears_and_prints() {
        let f = fixture().await;
        add_item(&f.menu, &f.order, biryani_with_raita()).unwrap();

        let response = generate_bill(&f.db, &f.order, &f.config, &f.printer)
            .await
            .unwrap();

        let today = Local::now().format("%Y%m%d").to_string();
        assert_eq!(response.bill.bill_number, format!("BP-{today}-001"));
        assert_eq!(response.bill.total.rupees(), 200);
        assert!(response.printed);
        assert_eq!(response.print_error, None);
        assert!(response.order.items.is_empty());
        assert!(f.order.snapshot().is_empty());

        let jobs = f.transport.jobs();
        assert_eq!(jobs.len(), 1);
        let (text, _, _) = encoding_rs::WINDOWS_1252.decode(&jobs[0]);
        assert!(text.contains(response.bill.bill_number.as_str()));
        assert!(text.contains("TOTAL: Rs200"));
    }

    #[tokio::test]
    async fn test_line_added_during_checkout_is_not_lost() {
        let f = fixture().await;
        add_item(&f.menu, &f.order, tea()).unwrap();

        let coffee = AddItemRequest {
            menu_item_id: "coffee".to_string(),
            portion: None,
            add_ons: vec![],
        };
        let (response, _) = tokio::join!(
            generate_bill(&f.db, &f.order, &f.config, &f.printer),
            async {
                tokio::task::yield_now().await;
                add_item(&f.menu, &f.order, coffee).unwrap();
            }
        );
        let response = response.unwrap();

        let billed = response
            .bill
            .items
            .iter()
            .filter(|line| line.menu_item_id == "coffee")
            .count();
        let kept = f
            .order
            .snapshot()
            .items()
            .iter()
            .filter(|line| line.menu_item_id == "coffee")
            .count();
        assert_eq!(billed + kept, 1);
        assert!(response.bill.items.iter().any(|line| line.menu_item_id == "tea"));
        assert_eq!(response.order.items, f.order.snapshot().items().to_vec());
    }

    #[tokio::test]
    async fn test_sequence_increments_per_checkout() {
        let f = fixture().await;
        for expected in ["001", "002", "003"] {
            add_item(&f.menu, &f.order, tea()).unwrap();
            let response = generate_bill(&f.db, &f.order, &f.config, &f.printer)
                .await
                .unwrap();
            assert!(response.bill.bill_number.ends_with(expected));
        }
    }

    #[tokio::test]
    async fn test_empty_order_rejected() {
        let f = fixture().await;
        let err = generate_bill(&f.db, &f.order, &f.config, &f.printer)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(todays_bills(&f.db).await.unwrap().is_empty());
        assert!(f.transport.jobs().is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_keeps_order() {
        let f = fixture().await;
        add_item(&f.menu, &f.order, tea()).unwrap();
        set_order_type(&f.order, OrderType::Parcel);
        let before = f.order.snapshot();

        f.db.inner().close().await;
        let err = generate_bill(&f.db, &f.order, &f.config, &f.printer)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::BillSaveFailed);
        assert_eq!(f.order.snapshot(), before);
        assert!(f.transport.jobs().is_empty());
    }

    #[tokio::test]
    async fn test_print_failure_keeps_bill_and_reprint_reuses_number() {
        let f = fixture().await;
        add_item(&f.menu, &f.order, tea()).unwrap();
        f.transport.fail_next_sends(1);
        f.transport.fail_next_connects(10);

        let response = generate_bill(&f.db, &f.order, &f.config, &f.printer)
            .await
            .unwrap();
        assert!(!response.printed);
        assert!(response.print_error.is_some());
        assert!(f.order.snapshot().is_empty());

        let saved = get_bill(&f.db, &response.bill.bill_number).await.unwrap();
        assert_eq!(saved, response.bill);

        f.transport.fail_next_connects(0);
        let reprinted = reprint_bill(&f.db, &f.config, &f.printer, &response.bill.bill_number)
            .await
            .unwrap();
        assert_eq!(reprinted.bill_number, response.bill.bill_number);
        assert_eq!(f.transport.jobs().len(), 1);

        let sales = daily_sales(&f.db, None).await.unwrap();
        assert_eq!(sales.count, 1);
    }

    #[tokio::test]
    async fn test_auto_print_off() {
        let f = fixture().await;
        f.config.update(|c| c.auto_print = false);
        add_item(&f.menu, &f.order, tea()).unwrap();

        let response = generate_bill(&f.db, &f.order, &f.config, &f.printer)
            .await
            .unwrap();
        assert!(!response.printed);
        assert_eq!(response.print_error, None);
        assert!(f.transport.jobs().is_empty());
    }

    #[tokio::test]
    async fn test_missing_bill_is_not_found() {
        let f = fixture().await;
        let err = reprint_bill(&f.db, &f.config, &f.printer, "BP-20241115-009")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = preview_receipt(&f.db, &f.config, "BP-20241115-009")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_preview_and_history() {
        let f = fixture().await;
        f.config.update(|c| c.shop_name = "Anna Mess".to_string());
        add_item(&f.menu, &f.order, biryani_with_raita()).unwrap();
        let first = generate_bill(&f.db, &f.order, &f.config, &f.printer)
            .await
            .unwrap();
        add_item(&f.menu, &f.order, tea()).unwrap();
        let second = generate_bill(&f.db, &f.order, &f.config, &f.printer)
            .await
            .unwrap();

        let preview = preview_receipt(&f.db, &f.config, &first.bill.bill_number)
            .await
            .unwrap();
        assert!(preview.contains("Anna Mess"));
        assert!(preview.contains("+ Raita"));
        assert!(!preview.contains('\x1B'));

        let bills = todays_bills(&f.db).await.unwrap();
        assert_eq!(bills.len(), 2);
        assert_eq!(bills[0].bill_number, second.bill.bill_number);

        let by_date = bills_for_date(&f.db, first.bill.business_date()).await.unwrap();
        assert_eq!(by_date.len(), 2);

        let sales = daily_sales(&f.db, Some(first.bill.business_date()))
            .await
            .unwrap();
        assert_eq!(sales.total.rupees(), 215);
    }
}
