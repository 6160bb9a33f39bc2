//! # Catalog Repository
//!
//! Database operations for products, outlets, and stock levels.
//!
//! Quantities live in their own `stock_levels` table keyed by
//! (model, outlet); a product's `stock_per_outlet` map is assembled on
//! load and written back row-by-row on snapshot.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;
use daybreak_core::{Outlet, Product};

/// Repository for catalog database operations.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    model_code: String,
    display_name: String,
    price_cents: i64,
}

#[derive(sqlx::FromRow)]
struct StockLevelRow {
    model_code: String,
    outlet_code: String,
    quantity: i64,
}

#[derive(sqlx::FromRow)]
struct OutletRow {
    code: String,
    name: String,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Loads every product with its per-outlet quantities.
    pub async fn load_products(&self) -> StoreResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT model_code, display_name, price_cents
            FROM products
            ORDER BY model_code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let levels: Vec<StockLevelRow> = sqlx::query_as(
            r#"
            SELECT model_code, outlet_code, quantity
            FROM stock_levels
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut products: Vec<Product> = rows
            .into_iter()
            .map(|r| Product::new(r.model_code, r.display_name, r.price_cents))
            .collect();

        for level in levels {
            if let Some(product) = products
                .iter_mut()
                .find(|p| p.model_code == level.model_code)
            {
                product.set_stock(level.outlet_code, level.quantity);
            }
        }

        Ok(products)
    }

    /// Loads every registered outlet.
    pub async fn load_outlets(&self) -> StoreResult<Vec<Outlet>> {
        let rows: Vec<OutletRow> = sqlx::query_as(
            r#"
            SELECT code, name
            FROM outlets
            ORDER BY code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| Outlet::new(r.code, r.name)).collect())
    }

    /// Inserts or updates an outlet.
    pub async fn upsert_outlet(&self, outlet: &Outlet) -> StoreResult<()> {
        debug!(code = %outlet.code, "Upserting outlet");

        sqlx::query(
            r#"
            INSERT INTO outlets (code, name)
            VALUES (?1, ?2)
            ON CONFLICT(code) DO UPDATE SET name = excluded.name
            "#,
        )
        .bind(&outlet.code)
        .bind(&outlet.name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts or updates one product and its stock levels.
    pub async fn upsert_product(&self, product: &Product) -> StoreResult<()> {
        debug!(model = %product.model_code, "Upserting product");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO products (model_code, display_name, price_cents)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(model_code) DO UPDATE SET
                display_name = excluded.display_name,
                price_cents = excluded.price_cents
            "#,
        )
        .bind(&product.model_code)
        .bind(&product.display_name)
        .bind(product.price_cents)
        .execute(&mut *tx)
        .await?;

        for (outlet_code, quantity) in &product.stock_per_outlet {
            sqlx::query(
                r#"
                INSERT INTO stock_levels (model_code, outlet_code, quantity)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(model_code, outlet_code) DO UPDATE SET
                    quantity = excluded.quantity
                "#,
            )
            .bind(&product.model_code)
            .bind(outlet_code)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Replaces the stored quantities with the snapshot's view.
    ///
    /// Runs as one database transaction: each product's old stock rows
    /// are dropped and rewritten so outlets removed from the map do not
    /// linger.
    pub async fn save_snapshot(&self, products: &[Product]) -> StoreResult<()> {
        debug!(models = products.len(), "Saving stock snapshot");

        let mut tx = self.pool.begin().await?;

        for product in products {
            sqlx::query(
                r#"
                INSERT INTO products (model_code, display_name, price_cents)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(model_code) DO UPDATE SET
                    display_name = excluded.display_name,
                    price_cents = excluded.price_cents
                "#,
            )
            .bind(&product.model_code)
            .bind(&product.display_name)
            .bind(product.price_cents)
            .execute(&mut *tx)
            .await?;

            sqlx::query("DELETE FROM stock_levels WHERE model_code = ?1")
                .bind(&product.model_code)
                .execute(&mut *tx)
                .await?;

            for (outlet_code, quantity) in &product.stock_per_outlet {
                sqlx::query(
                    r#"
                    INSERT INTO stock_levels (model_code, outlet_code, quantity)
                    VALUES (?1, ?2, ?3)
                    "#,
                )
                .bind(&product.model_code)
                .bind(outlet_code)
                .bind(quantity)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Number of products in the catalog.
    pub async fn count_products(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};

    async fn store() -> Store {
        Store::new(StoreConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_catalog_round_trip() {
        let store = store().await;
        let catalog = store.catalog();

        catalog
            .upsert_outlet(&Outlet::new("C60", "Central 60"))
            .await
            .unwrap();
        catalog
            .upsert_outlet(&Outlet::new("K12", "Klang 12"))
            .await
            .unwrap();

        let mut x1 = Product::new("X1", "Daybreak X1", 10000);
        x1.set_stock("C60", 10);
        x1.set_stock("K12", 3);
        catalog.upsert_product(&x1).await.unwrap();

        let outlets = catalog.load_outlets().await.unwrap();
        assert_eq!(outlets.len(), 2);
        assert_eq!(outlets[0].code, "C60");

        let products = catalog.load_products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price_cents, 10000);
        assert_eq!(products[0].stock("C60"), 10);
        assert_eq!(products[0].stock("K12"), 3);
    }

    #[tokio::test]
    async fn test_snapshot_replaces_quantities() {
        let store = store().await;
        let catalog = store.catalog();

        catalog
            .upsert_outlet(&Outlet::new("C60", "Central 60"))
            .await
            .unwrap();
        catalog
            .upsert_outlet(&Outlet::new("K12", "Klang 12"))
            .await
            .unwrap();

        let mut x1 = Product::new("X1", "Daybreak X1", 10000);
        x1.set_stock("C60", 10);
        x1.set_stock("K12", 3);
        catalog.upsert_product(&x1).await.unwrap();

        // Snapshot drops K12 entirely and changes C60
        let mut snapshot = Product::new("X1", "Daybreak X1", 10000);
        snapshot.set_stock("C60", 4);
        catalog.save_snapshot(&[snapshot]).await.unwrap();

        let products = catalog.load_products().await.unwrap();
        assert_eq!(products[0].stock("C60"), 4);
        assert_eq!(products[0].stock("K12"), 0);
    }

    #[tokio::test]
    async fn test_count_products() {
        let store = store().await;
        let catalog = store.catalog();
        assert_eq!(catalog.count_products().await.unwrap(), 0);

        catalog
            .upsert_product(&Product::new("X1", "Daybreak X1", 10000))
            .await
            .unwrap();
        assert_eq!(catalog.count_products().await.unwrap(), 1);
    }
}
