//! # Sale Repository
//!
//! Database operations for committed sale transactions.
//!
//! ## Persistence Shape
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  sales            one row per transaction                        │
//! │  sale_lines       one row per line, ordered by line_no           │
//! │                                                                  │
//! │  insert_transaction() writes both inside ONE database            │
//! │  transaction - a sale is never visible without its lines.        │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use daybreak_core::{PaymentMethod, SaleLine, SaleTransaction};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct SaleRow {
    id: String,
    outlet_code: String,
    customer_name: String,
    payment_method: PaymentMethod,
    employee_id: String,
    employee_name: String,
    total_cents: i64,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct SaleLineRow {
    model_code: String,
    quantity: i64,
    unit_price_cents: i64,
    subtotal_cents: i64,
}

impl SaleRow {
    fn into_transaction(self, lines: Vec<SaleLine>) -> SaleTransaction {
        SaleTransaction {
            id: self.id,
            outlet_code: self.outlet_code,
            customer_name: self.customer_name,
            payment_method: self.payment_method,
            employee_id: self.employee_id,
            employee_name: self.employee_name,
            created_at: self.created_at,
            lines,
            total_cents: self.total_cents,
        }
    }
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Persists a committed transaction and its lines as one unit.
    pub async fn insert_transaction(&self, transaction: &SaleTransaction) -> StoreResult<()> {
        debug!(
            id = %transaction.id,
            lines = transaction.lines.len(),
            "Inserting sale transaction"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, outlet_code, customer_name, payment_method,
                employee_id, employee_name, total_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.outlet_code)
        .bind(&transaction.customer_name)
        .bind(transaction.payment_method)
        .bind(&transaction.employee_id)
        .bind(&transaction.employee_name)
        .bind(transaction.total_cents)
        .bind(transaction.created_at)
        .execute(&mut *tx)
        .await?;

        for (line_no, line) in transaction.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_lines (
                    sale_id, line_no, model_code,
                    quantity, unit_price_cents, subtotal_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&transaction.id)
            .bind(line_no as i64)
            .bind(&line.model_code)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .bind(line.subtotal_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Gets a transaction with its lines by id.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<SaleTransaction> {
        let row: Option<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, outlet_code, customer_name, payment_method,
                   employee_id, employee_name, total_cents, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or_else(|| StoreError::not_found("Sale", id))?;
        let lines = self.lines_for(id).await?;
        Ok(row.into_transaction(lines))
    }

    /// Lists the transactions committed on one (UTC) day, oldest first.
    pub async fn list_for_day(&self, date: NaiveDate) -> StoreResult<Vec<SaleTransaction>> {
        let start = date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| StoreError::Internal("invalid date".to_string()))?;
        let end = start + TimeDelta::days(1);

        let rows: Vec<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, outlet_code, customer_name, payment_method,
                   employee_id, employee_name, total_cents, created_at
            FROM sales
            WHERE created_at >= ?1 AND created_at < ?2
            ORDER BY created_at
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let mut transactions = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.id.clone();
            let lines = self.lines_for(&id).await?;
            transactions.push(row.into_transaction(lines));
        }
        Ok(transactions)
    }

    /// Lines for one transaction, in line order.
    async fn lines_for(&self, sale_id: &str) -> StoreResult<Vec<SaleLine>> {
        let rows: Vec<SaleLineRow> = sqlx::query_as(
            r#"
            SELECT model_code, quantity, unit_price_cents, subtotal_cents
            FROM sale_lines
            WHERE sale_id = ?1
            ORDER BY line_no
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SaleLine {
                model_code: r.model_code,
                quantity: r.quantity,
                unit_price_cents: r.unit_price_cents,
                subtotal_cents: r.subtotal_cents,
            })
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};

    fn transaction(id: &str, at: &str) -> SaleTransaction {
        SaleTransaction {
            id: id.to_string(),
            outlet_code: "C60".to_string(),
            customer_name: "Aisyah".to_string(),
            payment_method: PaymentMethod::Cash,
            employee_id: "E001".to_string(),
            employee_name: "Farah".to_string(),
            created_at: at.parse().unwrap(),
            lines: vec![
                SaleLine {
                    model_code: "X1".to_string(),
                    quantity: 6,
                    unit_price_cents: 10000,
                    subtotal_cents: 60000,
                },
                SaleLine {
                    model_code: "X1".to_string(),
                    quantity: 4,
                    unit_price_cents: 10000,
                    subtotal_cents: 40000,
                },
            ],
            total_cents: 100_000,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_preserves_line_order() {
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();
        let sales = store.sales();

        sales
            .insert_transaction(&transaction("s-1", "2026-03-02T10:00:00Z"))
            .await
            .unwrap();

        let loaded = sales.get_by_id("s-1").await.unwrap();
        assert_eq!(loaded.lines.len(), 2);
        assert_eq!(loaded.lines[0].quantity, 6);
        assert_eq!(loaded.lines[1].quantity, 4);
        assert_eq!(loaded.total_cents, 100_000);
        assert_eq!(loaded.payment_method, PaymentMethod::Cash);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();
        let err = store.sales().get_by_id("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_for_day_filters_by_utc_date() {
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();
        let sales = store.sales();

        sales
            .insert_transaction(&transaction("s-1", "2026-03-02T10:00:00Z"))
            .await
            .unwrap();
        sales
            .insert_transaction(&transaction("s-2", "2026-03-02T23:59:59Z"))
            .await
            .unwrap();
        sales
            .insert_transaction(&transaction("s-3", "2026-03-03T00:00:01Z"))
            .await
            .unwrap();

        let day: NaiveDate = "2026-03-02".parse().unwrap();
        let listed = sales.list_for_day(day).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "s-1");
        assert_eq!(listed[1].id, "s-2");
    }
}
