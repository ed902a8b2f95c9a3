//! # Bill Repository
//!
//! Bill numbering, persistence and history.
//!
//! ## Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save_bill(new_bill)                                                    │
//! │     │                                                                   │
//! │     ├── BEGIN                                                           │
//! │     ├── daily_counter[business_date] += 1  (upsert … RETURNING)        │
//! │     ├── bill_number = PREFIX-YYYYMMDD-NNN                              │
//! │     ├── INSERT INTO bills … RETURNING id                               │
//! │     └── COMMIT                                                          │
//! │                                                                         │
//! │  Any failure before COMMIT rolls the counter back, so a failed save    │
//! │  never burns a bill number.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The business date is the calendar day of `created_at` in the outlet's
//! own UTC offset, not the UTC date.

use annabill_core::{Bill, BillNumber, DailySales, Money, NewBill, OrderLine, OrderType};
use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_BILL: &str = r#"
    SELECT id, bill_number, order_type, items_json,
           subtotal_paise, total_paise, created_at
    FROM bills
"#;

/// Repository for bill database operations.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
    prefix: String,
}

#[derive(Debug, sqlx::FromRow)]
struct BillRow {
    id: i64,
    bill_number: String,
    order_type: OrderType,
    items_json: String,
    subtotal_paise: i64,
    total_paise: i64,
    created_at: String,
}

impl BillRow {
    fn into_bill(self) -> DbResult<Bill> {
        let items: Vec<OrderLine> = serde_json::from_str(&self.items_json)
            .map_err(|e| DbError::corrupt("Bill", self.id.to_string(), e))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| DbError::corrupt("Bill", self.id.to_string(), e))?;

        Ok(Bill {
            id: Some(self.id),
            bill_number: self.bill_number,
            order_type: self.order_type,
            items,
            subtotal: Money::from_paise(self.subtotal_paise),
            total: Money::from_paise(self.total_paise),
            created_at,
        })
    }
}

impl BillRepository {
    /// Creates a new BillRepository using the default prefix.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository {
            pool,
            prefix: annabill_core::DEFAULT_BILL_PREFIX.to_string(),
        }
    }

    /// Uses `prefix` for bill numbers allocated by this repository.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    // =========================================================================
    // Numbering
    // =========================================================================

    /// Allocates the next bill number for `date`.
    ///
    /// The first call for a date yields sequence 1. Each call consumes a
    /// number; [`BillRepository::save_bill`] allocates its own inside the
    /// save transaction and does not need this.
    pub async fn next_bill_number(&self, date: NaiveDate) -> DbResult<String> {
        let sequence = allocate_sequence(&self.pool, date).await?;
        let number = BillNumber::new(self.prefix.as_str(), date, sequence).to_string();
        debug!(bill_number = %number, "Allocated bill number");
        Ok(number)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Saves a bill stamped with the current local time.
    pub async fn save_bill(&self, new_bill: &NewBill) -> DbResult<Bill> {
        self.save_bill_at(new_bill, Local::now().fixed_offset()).await
    }

    /// Saves a bill with an explicit creation time.
    ///
    /// Numbering and insert share one transaction.
    pub async fn save_bill_at(
        &self,
        new_bill: &NewBill,
        created_at: DateTime<FixedOffset>,
    ) -> DbResult<Bill> {
        let business_date = created_at.date_naive();
        let items_json = serde_json::to_string(&new_bill.items)
            .map_err(|e| DbError::Internal(format!("Failed to encode bill items: {e}")))?;

        let mut tx = self.pool.begin().await?;

        let sequence = allocate_sequence(&mut *tx, business_date).await?;
        let bill_number =
            BillNumber::new(self.prefix.as_str(), business_date, sequence).to_string();

        debug!(
            bill_number = %bill_number,
            lines = new_bill.items.len(),
            total_paise = new_bill.total.paise(),
            "Inserting bill"
        );

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO bills (
                bill_number, order_type, items_json,
                subtotal_paise, total_paise, business_date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id
            "#,
        )
        .bind(&bill_number)
        .bind(new_bill.order_type)
        .bind(&items_json)
        .bind(new_bill.subtotal.paise())
        .bind(new_bill.total.paise())
        .bind(business_date.format(DATE_FORMAT).to_string())
        .bind(created_at.to_rfc3339())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(id, bill_number = %bill_number, "Bill saved");

        Ok(Bill {
            id: Some(id),
            bill_number,
            order_type: new_bill.order_type,
            items: new_bill.items.clone(),
            subtotal: new_bill.subtotal,
            total: new_bill.total,
            created_at,
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a bill by row id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Bill>> {
        let row: Option<BillRow> = sqlx::query_as(&format!("{SELECT_BILL} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(BillRow::into_bill).transpose()
    }

    /// Gets a bill by its bill number.
    pub async fn get_by_number(&self, bill_number: &str) -> DbResult<Option<Bill>> {
        let row: Option<BillRow> =
            sqlx::query_as(&format!("{SELECT_BILL} WHERE bill_number = ?1"))
                .bind(bill_number)
                .fetch_optional(&self.pool)
                .await?;

        row.map(BillRow::into_bill).transpose()
    }

    /// Bills of one business day, newest first.
    pub async fn bills_for_date(&self, date: NaiveDate) -> DbResult<Vec<Bill>> {
        let rows: Vec<BillRow> = sqlx::query_as(&format!(
            "{SELECT_BILL} WHERE business_date = ?1 ORDER BY id DESC"
        ))
        .bind(date.format(DATE_FORMAT).to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BillRow::into_bill).collect()
    }

    /// Bills of the current local day, newest first.
    pub async fn todays_bills(&self) -> DbResult<Vec<Bill>> {
        self.bills_for_date(Local::now().date_naive()).await
    }

    /// Bill count and summed totals for one business day.
    pub async fn daily_sales(&self, date: NaiveDate) -> DbResult<DailySales> {
        let (count, total): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total_paise), 0)
            FROM bills
            WHERE business_date = ?1
            "#,
        )
        .bind(date.format(DATE_FORMAT).to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(DailySales {
            date,
            count,
            total: Money::from_paise(total),
        })
    }
}

/// Bumps the counter for `date` and returns the new value.
async fn allocate_sequence<'e, E>(executor: E, date: NaiveDate) -> DbResult<u32>
where
    E: Executor<'e, Database = Sqlite>,
{
    let counter: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO daily_counter (date, counter) VALUES (?1, 1)
        ON CONFLICT (date) DO UPDATE SET counter = counter + 1
        RETURNING counter
        "#,
    )
    .bind(date.format(DATE_FORMAT).to_string())
    .fetch_one(executor)
    .await?;

    u32::try_from(counter)
        .map_err(|_| DbError::corrupt("daily_counter", date.to_string(), "counter out of range"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use annabill_core::menu::Menu;
    use annabill_core::{Order, Portion};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn biryani_order() -> Order {
        let menu = Menu::default();
        let biryani = menu.item("chicken_biryani").unwrap();
        let raita = menu.add_on("raita").unwrap().select(1);
        Order::new().add_item(biryani, Some(Portion::Full), vec![raita])
    }

    fn tea_order(cups: i64) -> Order {
        let menu = Menu::default();
        let tea = menu.item("tea").unwrap();
        let order = Order::new().add_item(tea, None, vec![]);
        let line_id = order.items()[0].id.clone();
        order.update_quantity(&line_id, cups)
    }

    #[tokio::test]
    async fn test_sequence_per_day() {
        let db = db().await;
        let repo = db.bills().with_prefix("BP");
        let bill = NewBill::from(&tea_order(1));

        let first = repo
            .save_bill_at(&bill, at("2024-11-15T09:00:00+05:30"))
            .await
            .unwrap();
        let second = repo
            .save_bill_at(&bill, at("2024-11-15T21:00:00+05:30"))
            .await
            .unwrap();
        let next_day = repo
            .save_bill_at(&bill, at("2024-11-16T08:00:00+05:30"))
            .await
            .unwrap();

        assert_eq!(first.bill_number, "BP-20241115-001");
        assert_eq!(second.bill_number, "BP-20241115-002");
        assert_eq!(next_day.bill_number, "BP-20241116-001");
    }

    #[tokio::test]
    async fn test_business_date_uses_local_offset() {
        let db = db().await;
        let repo = db.bills();
        // 00:30 IST on the 16th is still the 15th in UTC.
        let bill = repo
            .save_bill_at(
                &NewBill::from(&tea_order(1)),
                at("2024-11-16T00:30:00+05:30"),
            )
            .await
            .unwrap();

        assert_eq!(bill.bill_number, "AB-20241116-001");
        assert_eq!(bill.business_date(), date(2024, 11, 16));
    }

    #[tokio::test]
    async fn test_next_bill_number_shares_counter() {
        let db = db().await;
        let repo = db.bills();
        let day = date(2024, 11, 15);

        assert_eq!(repo.next_bill_number(day).await.unwrap(), "AB-20241115-001");
        assert_eq!(repo.next_bill_number(day).await.unwrap(), "AB-20241115-002");

        let bill = repo
            .save_bill_at(
                &NewBill::from(&tea_order(1)),
                at("2024-11-15T12:00:00+05:30"),
            )
            .await
            .unwrap();
        assert_eq!(bill.bill_number, "AB-20241115-003");
    }

    #[tokio::test]
    async fn test_saved_bill_round_trips() {
        let db = db().await;
        let repo = db.bills();
        let order = biryani_order().set_order_type(OrderType::Parcel);

        let saved = repo
            .save_bill_at(&NewBill::from(&order), at("2024-11-15T13:05:00+05:30"))
            .await
            .unwrap();
        let id = saved.id.unwrap();

        let loaded = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.order_type, OrderType::Parcel);
        assert_eq!(loaded.items[0].add_ons[0].name, "Raita");
        assert_eq!(loaded.total.rupees(), 200);

        let by_number = repo.get_by_number(&saved.bill_number).await.unwrap();
        assert_eq!(by_number, Some(saved));
    }

    #[tokio::test]
    async fn test_missing_bill_is_none() {
        let db = db().await;
        assert!(db.bills().get_by_id(999).await.unwrap().is_none());
        assert!(db
            .bills()
            .get_by_number("AB-20240101-001")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_bills_for_date_newest_first() {
        let db = db().await;
        let repo = db.bills();
        let bill = NewBill::from(&tea_order(2));

        repo.save_bill_at(&bill, at("2024-11-14T10:00:00+05:30"))
            .await
            .unwrap();
        let a = repo
            .save_bill_at(&bill, at("2024-11-15T10:00:00+05:30"))
            .await
            .unwrap();
        let b = repo
            .save_bill_at(&bill, at("2024-11-15T11:00:00+05:30"))
            .await
            .unwrap();

        let bills = repo.bills_for_date(date(2024, 11, 15)).await.unwrap();
        let numbers: Vec<_> = bills.iter().map(|b| b.bill_number.as_str()).collect();
        assert_eq!(numbers, vec![b.bill_number.as_str(), a.bill_number.as_str()]);
    }

    #[tokio::test]
    async fn test_daily_sales() {
        let db = db().await;
        let repo = db.bills();

        repo.save_bill_at(
            &NewBill::from(&biryani_order()),
            at("2024-11-15T12:00:00+05:30"),
        )
        .await
        .unwrap();
        repo.save_bill_at(
            &NewBill::from(&tea_order(3)),
            at("2024-11-15T16:00:00+05:30"),
        )
        .await
        .unwrap();

        let sales = repo.daily_sales(date(2024, 11, 15)).await.unwrap();
        assert_eq!(sales.count, 2);
        assert_eq!(sales.total.rupees(), 245);

        let empty = repo.daily_sales(date(2024, 11, 16)).await.unwrap();
        assert_eq!(empty.count, 0);
        assert!(empty.total.is_zero());
    }

    #[tokio::test]
    async fn test_failed_insert_does_not_burn_number() {
        let db = db().await;
        let repo = db.bills();

        // A stray row already holding the day's first number.
        sqlx::query(
            r#"
            INSERT INTO bills (bill_number, order_type, items_json,
                               subtotal_paise, total_paise, business_date, created_at)
            VALUES ('AB-20241115-001', 'dine-in', '[]', 0, 0, '2024-11-15',
                    '2024-11-15T08:00:00+05:30')
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = repo
            .save_bill_at(
                &NewBill::from(&tea_order(1)),
                at("2024-11-15T09:00:00+05:30"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // The counter rolled back with the insert.
        assert_eq!(
            repo.next_bill_number(date(2024, 11, 15)).await.unwrap(),
            "AB-20241115-001"
        );
    }

    #[tokio::test]
    async fn test_concurrent_saves_get_distinct_numbers() {
        let db = db().await;
        let repo = db.bills();
        let bill = NewBill::from(&tea_order(1));
        let created = at("2024-11-15T12:00:00+05:30");

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let repo = repo.clone();
                let bill = bill.clone();
                tokio::spawn(async move { repo.save_bill_at(&bill, created).await })
            })
            .collect();

        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.unwrap().unwrap().bill_number);
        }
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), 5);
        assert_eq!(numbers[4], "AB-20241115-005");
    }

    #[tokio::test]
    async fn test_corrupt_items_json_is_reported() {
        let db = db().await;
        sqlx::query(
            r#"
            INSERT INTO bills (bill_number, order_type, items_json,
                               subtotal_paise, total_paise, business_date, created_at)
            VALUES ('AB-20241115-009', 'parcel', 'not json', 0, 0, '2024-11-15',
                    '2024-11-15T08:00:00+05:30')
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = db
            .bills()
            .get_by_number("AB-20241115-009")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::CorruptRecord { .. }));
    }
}
