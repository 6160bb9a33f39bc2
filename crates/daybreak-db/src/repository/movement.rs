//! # Stock Movement Repository
//!
//! Database operations for completed stock movement events. Events are
//! append-only: written once after application, never mutated.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use daybreak_core::{MovementItem, MovementKind, StockMovement};

/// Repository for stock movement events.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct MovementRow {
    id: String,
    kind: MovementKind,
    source: String,
    destination: String,
    operator_id: String,
    operator_name: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct MovementItemRow {
    model_code: String,
    quantity: i64,
}

impl MovementRepository {
    /// Creates a new MovementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Persists a movement event and its items as one unit.
    pub async fn insert(&self, movement: &StockMovement) -> StoreResult<()> {
        debug!(
            id = %movement.id,
            kind = ?movement.kind,
            items = movement.items.len(),
            "Inserting stock movement"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO stock_movements (
                id, kind, source, destination,
                operator_id, operator_name, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&movement.id)
        .bind(movement.kind)
        .bind(&movement.source)
        .bind(&movement.destination)
        .bind(&movement.operator_id)
        .bind(&movement.operator_name)
        .bind(movement.created_at)
        .execute(&mut *tx)
        .await?;

        for item in &movement.items {
            sqlx::query(
                r#"
                INSERT INTO stock_movement_items (movement_id, model_code, quantity)
                VALUES (?1, ?2, ?3)
                "#,
            )
            .bind(&movement.id)
            .bind(&item.model_code)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Gets one movement event with its items.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<StockMovement> {
        let row: Option<MovementRow> = sqlx::query_as(
            r#"
            SELECT id, kind, source, destination,
                   operator_id, operator_name, created_at
            FROM stock_movements
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or_else(|| StoreError::not_found("Stock movement", id))?;

        let items: Vec<MovementItemRow> = sqlx::query_as(
            r#"
            SELECT model_code, quantity
            FROM stock_movement_items
            WHERE movement_id = ?1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(StockMovement {
            id: row.id,
            kind: row.kind,
            source: row.source,
            destination: row.destination,
            items: items
                .into_iter()
                .map(|i| MovementItem::new(i.model_code, i.quantity))
                .collect(),
            operator_id: row.operator_id,
            operator_name: row.operator_name,
            created_at: row.created_at,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
