//! # Flat-File Gateway
//!
//! A [`PersistenceGateway`] over the plain-text interchange formats:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  <root>/                                                         │
//! │  ├── outlet.csv        code,name                                 │
//! │  ├── model.csv         Model,Price,<outlet codes...>   (header)  │
//! │  │                     X1,100.00,10,0                  (rows)    │
//! │  ├── attendance.csv    id,name,date,in,out,hours,outlet          │
//! │  ├── sales.csv         one row PER LINE ITEM, append-only        │
//! │  └── movements/                                                  │
//! │      └── movements_YYYY-MM-DD.log   human-readable entries       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are unquoted and comma-separated; the formats match what the
//! surrounding tooling (spreadsheets, the legacy importer) already reads.
//! Missing files read as empty stores; malformed lines are hard errors
//! with file and line context.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use daybreak_core::{
    AttendanceRecord, Money, Outlet, Product, SaleTransaction, StockMovement,
};
use daybreak_engine::{GatewayError, PersistenceGateway};

use crate::error::{StoreError, StoreResult};

const OUTLET_FILE: &str = "outlet.csv";
const CATALOG_FILE: &str = "model.csv";
const ATTENDANCE_FILE: &str = "attendance.csv";
const SALES_FILE: &str = "sales.csv";
const MOVEMENT_DIR: &str = "movements";
const LOG_SEPARATOR: &str = "--------------------------------------------------";

/// Flat-file persistence gateway rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FlatFileGateway {
    root: PathBuf,
}

impl FlatFileGateway {
    /// Creates a gateway over `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FlatFileGateway { root: root.into() }
    }

    /// The data directory this gateway reads and writes.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    async fn read_lines(&self, file: &str) -> StoreResult<Option<Vec<String>>> {
        let path = self.path(file);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(
                content
                    .lines()
                    .map(str::to_string)
                    .filter(|l| !l.trim().is_empty())
                    .collect(),
            )),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_file(&self, file: &str, content: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.root).await?;
        fs::write(self.path(file), content).await?;
        Ok(())
    }

    async fn append_file(&self, path: &Path, content: &str) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    // =========================================================================
    // Outlets
    // =========================================================================

    /// Loads outlets from `outlet.csv`; missing file reads as empty.
    pub async fn read_outlets(&self) -> StoreResult<Vec<Outlet>> {
        let Some(lines) = self.read_lines(OUTLET_FILE).await? else {
            return Ok(Vec::new());
        };

        let mut outlets = Vec::with_capacity(lines.len());
        for (number, line) in lines.iter().enumerate() {
            let mut fields = line.splitn(2, ',');
            let code = fields.next().unwrap_or("").trim();
            let name = fields.next().unwrap_or("").trim();
            if code.is_empty() {
                return Err(StoreError::malformed(
                    OUTLET_FILE,
                    number + 1,
                    "missing outlet code",
                ));
            }
            outlets.push(Outlet::new(code, name));
        }
        Ok(outlets)
    }

    /// Writes the outlet registry. Registration is a tooling concern, so
    /// this sits outside the gateway trait.
    pub async fn write_outlets(&self, outlets: &[Outlet]) -> StoreResult<()> {
        let mut content = String::new();
        for outlet in outlets {
            content.push_str(&format!("{},{}\n", outlet.code, outlet.name));
        }
        self.write_file(OUTLET_FILE, &content).await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Loads the catalog from `model.csv`; missing file reads as empty.
    pub async fn read_catalog(&self) -> StoreResult<Vec<Product>> {
        let Some(lines) = self.read_lines(CATALOG_FILE).await? else {
            return Ok(Vec::new());
        };
        let Some((header, rows)) = lines.split_first() else {
            return Ok(Vec::new());
        };

        // Header: Model,Price,C60,K12,...
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        if columns.len() < 2 {
            return Err(StoreError::malformed(
                CATALOG_FILE,
                1,
                "header must start with Model,Price",
            ));
        }
        let outlet_codes: Vec<&str> = columns[2..].to_vec();

        let mut products = Vec::with_capacity(rows.len());
        for (number, line) in rows.iter().enumerate() {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() < 2 {
                return Err(StoreError::malformed(
                    CATALOG_FILE,
                    number + 2,
                    "expected model code and price",
                ));
            }

            let price: Money = fields[1].parse().map_err(|_| {
                StoreError::malformed(CATALOG_FILE, number + 2, "unparsable price")
            })?;
            let mut product = Product::new(fields[0], fields[0], price.cents());

            for (index, code) in outlet_codes.iter().enumerate() {
                let quantity: i64 = match fields.get(index + 2) {
                    Some(raw) if !raw.is_empty() => raw.parse().map_err(|_| {
                        StoreError::malformed(CATALOG_FILE, number + 2, "unparsable quantity")
                    })?,
                    _ => 0,
                };
                product.set_stock(*code, quantity);
            }
            products.push(product);
        }
        Ok(products)
    }

    /// Writes the catalog with quantities in a stable outlet column order:
    /// the registered outlets first, then any extra codes found only in
    /// the products, sorted.
    pub async fn write_catalog(&self, products: &[Product]) -> StoreResult<()> {
        let mut columns: Vec<String> = self
            .read_outlets()
            .await?
            .into_iter()
            .map(|o| o.code)
            .collect();
        let mut extra: Vec<String> = products
            .iter()
            .flat_map(|p| p.stock_per_outlet.keys().cloned())
            .filter(|code| !columns.contains(code))
            .collect();
        extra.sort();
        extra.dedup();
        columns.extend(extra);

        let mut content = if columns.is_empty() {
            "Model,Price\n".to_string()
        } else {
            format!("Model,Price,{}\n", columns.join(","))
        };
        for product in products {
            content.push_str(&product.model_code);
            content.push(',');
            content.push_str(&product.price().to_plain_string());
            for code in &columns {
                content.push_str(&format!(",{}", product.stock(code)));
            }
            content.push('\n');
        }

        debug!(models = products.len(), "Writing catalog file");
        self.write_file(CATALOG_FILE, &content).await
    }

    // =========================================================================
    // Attendance
    // =========================================================================

    /// Loads attendance from `attendance.csv`; missing file reads as empty.
    pub async fn read_attendance(&self) -> StoreResult<Vec<AttendanceRecord>> {
        let Some(lines) = self.read_lines(ATTENDANCE_FILE).await? else {
            return Ok(Vec::new());
        };

        let mut records = Vec::with_capacity(lines.len());
        for (number, line) in lines.iter().enumerate() {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() < 7 {
                return Err(StoreError::malformed(
                    ATTENDANCE_FILE,
                    number + 1,
                    "expected 7 fields",
                ));
            }

            let date: NaiveDate = fields[2].parse().map_err(|_| {
                StoreError::malformed(ATTENDANCE_FILE, number + 1, "unparsable date")
            })?;
            let clock_in: NaiveTime = fields[3].parse().map_err(|_| {
                StoreError::malformed(ATTENDANCE_FILE, number + 1, "unparsable clock-in")
            })?;
            let clock_out: Option<NaiveTime> = if fields[4].is_empty() {
                None
            } else {
                Some(fields[4].parse().map_err(|_| {
                    StoreError::malformed(ATTENDANCE_FILE, number + 1, "unparsable clock-out")
                })?)
            };
            let hours_worked: f64 = fields[5].parse().map_err(|_| {
                StoreError::malformed(ATTENDANCE_FILE, number + 1, "unparsable hours")
            })?;

            records.push(AttendanceRecord {
                employee_id: fields[0].to_string(),
                employee_name: fields[1].to_string(),
                date,
                clock_in,
                clock_out,
                hours_worked,
                outlet_code: fields[6].to_string(),
            });
        }
        Ok(records)
    }

    async fn write_attendance(&self, records: &[AttendanceRecord]) -> StoreResult<()> {
        let mut content = String::new();
        for record in records {
            content.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                record.employee_id,
                record.employee_name,
                record.date,
                record.clock_in.format("%H:%M:%S"),
                record
                    .clock_out
                    .map(|t| t.format("%H:%M:%S").to_string())
                    .unwrap_or_default(),
                record.hours_worked,
                record.outlet_code,
            ));
        }
        self.write_file(ATTENDANCE_FILE, &content).await
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Appends one row per line item to `sales.csv`.
    async fn append_sale(&self, transaction: &SaleTransaction) -> StoreResult<()> {
        let date = transaction.created_at.format("%Y-%m-%d");
        let time = transaction.created_at.format("%I:%M %p");

        let mut content = String::new();
        for line in &transaction.lines {
            content.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{}\n",
                date,
                time,
                transaction.customer_name,
                line.model_code,
                line.quantity,
                line.subtotal().to_plain_string(),
                transaction.payment_method,
                transaction.employee_name,
                transaction.outlet_code,
                transaction.employee_id,
            ));
        }

        debug!(id = %transaction.id, lines = transaction.lines.len(), "Appending sale rows");
        self.append_file(&self.path(SALES_FILE), &content).await
    }

    /// Reads back every sales row as raw fields, for export checks.
    pub async fn read_sales_rows(&self) -> StoreResult<Vec<Vec<String>>> {
        let Some(lines) = self.read_lines(SALES_FILE).await? else {
            return Ok(Vec::new());
        };
        Ok(lines
            .iter()
            .map(|l| l.split(',').map(|f| f.trim().to_string()).collect())
            .collect())
    }
}

// =============================================================================
// Gateway Implementation
// =============================================================================

#[async_trait]
impl PersistenceGateway for FlatFileGateway {
    async fn load_catalog(&self) -> Result<Vec<Product>, GatewayError> {
        Ok(self.read_catalog().await?)
    }

    async fn load_outlets(&self) -> Result<Vec<Outlet>, GatewayError> {
        Ok(self.read_outlets().await?)
    }

    async fn load_attendance(&self) -> Result<Vec<AttendanceRecord>, GatewayError> {
        Ok(self.read_attendance().await?)
    }

    async fn save_transaction(&self, transaction: &SaleTransaction) -> Result<(), GatewayError> {
        Ok(self.append_sale(transaction).await?)
    }

    async fn save_stock_snapshot(&self, products: &[Product]) -> Result<(), GatewayError> {
        Ok(self.write_catalog(products).await?)
    }

    async fn save_attendance(&self, record: &AttendanceRecord) -> Result<(), GatewayError> {
        // The file holds one row per (employee, date); rewrite with the
        // touched record replaced or appended.
        let mut records = self.read_attendance().await?;
        match records
            .iter_mut()
            .find(|r| r.employee_id == record.employee_id && r.date == record.date)
        {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(self.write_attendance(&records).await?)
    }

    async fn append_movement_log(&self, movement: &StockMovement) -> Result<(), GatewayError> {
        let names: HashMap<String, String> = self
            .read_outlets()
            .await?
            .into_iter()
            .map(|o| (o.code, o.name))
            .collect();
        let resolve = |code: &str| {
            names
                .get(code)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string())
        };

        let entry = movement.log_entry(&resolve(&movement.source), &resolve(&movement.destination));
        let file = self.root.join(MOVEMENT_DIR).join(format!(
            "movements_{}.log",
            movement.created_at.format("%Y-%m-%d")
        ));
        let content = format!("{}\n{}\n", entry, LOG_SEPARATOR);
        Ok(self.append_file(&file, &content).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use daybreak_core::PaymentMethod;
    use daybreak_engine::SalesEngine;
    use uuid::Uuid;

    fn scratch_gateway() -> FlatFileGateway {
        let dir = std::env::temp_dir().join(format!("daybreak-flatfile-{}", Uuid::new_v4()));
        FlatFileGateway::new(dir)
    }

    async fn seed(gateway: &FlatFileGateway) {
        gateway
            .write_outlets(&[
                Outlet::new("C60", "Central 60"),
                Outlet::new("K12", "Klang 12"),
            ])
            .await
            .unwrap();

        let mut x1 = Product::new("X1", "X1", 10000);
        x1.set_stock("C60", 10);
        let mut z9 = Product::new("Z9", "Z9", 2500);
        z9.set_stock("K12", 5);
        gateway.write_catalog(&[x1, z9]).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_files_read_as_empty() {
        let gateway = scratch_gateway();
        assert!(gateway.read_catalog().await.unwrap().is_empty());
        assert!(gateway.read_outlets().await.unwrap().is_empty());
        assert!(gateway.read_attendance().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_catalog_round_trip_keeps_header_order() {
        let gateway = scratch_gateway();
        seed(&gateway).await;

        let content = fs::read_to_string(gateway.path(CATALOG_FILE)).await.unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap(), "Model,Price,C60,K12");
        assert_eq!(lines.next().unwrap(), "X1,100.00,10,0");
        assert_eq!(lines.next().unwrap(), "Z9,25.00,0,5");

        let products = gateway.read_catalog().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price_cents, 10000);
        assert_eq!(products[0].stock("C60"), 10);
        assert_eq!(products[1].stock("K12"), 5);
    }

    #[tokio::test]
    async fn test_attendance_upsert_rewrites_one_row() {
        let gateway = scratch_gateway();

        let mut record = AttendanceRecord::open(
            "E001",
            "Farah",
            "2026-03-02".parse::<NaiveDate>().unwrap(),
            "09:00:00".parse::<NaiveTime>().unwrap(),
            "C60",
        );
        gateway.save_attendance(&record).await.unwrap();

        record.close("17:30:00".parse().unwrap());
        gateway.save_attendance(&record).await.unwrap();

        let records = gateway.read_attendance().await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].is_open());
        assert!((records[0].hours_worked - 8.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_sales_rows_one_per_line_item() {
        let gateway = scratch_gateway();
        seed(&gateway).await;

        let transaction = SaleTransaction {
            id: "s-1".to_string(),
            outlet_code: "C60".to_string(),
            customer_name: "Aisyah".to_string(),
            payment_method: PaymentMethod::Cash,
            employee_id: "E001".to_string(),
            employee_name: "Farah".to_string(),
            created_at: "2026-03-02T10:15:00Z".parse().unwrap(),
            lines: vec![
                daybreak_core::SaleLine {
                    model_code: "X1".to_string(),
                    quantity: 6,
                    unit_price_cents: 10000,
                    subtotal_cents: 60000,
                },
                daybreak_core::SaleLine {
                    model_code: "X1".to_string(),
                    quantity: 4,
                    unit_price_cents: 10000,
                    subtotal_cents: 40000,
                },
            ],
            total_cents: 100_000,
        };
        gateway.save_transaction(&transaction).await.unwrap();

        let rows = gateway.read_sales_rows().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            vec![
                "2026-03-02",
                "10:15 AM",
                "Aisyah",
                "X1",
                "6",
                "600.00",
                "Cash",
                "Farah",
                "C60",
                "E001",
            ]
        );
        assert_eq!(rows[1][5], "400.00");
    }

    #[tokio::test]
    async fn test_movement_log_is_daily_and_human_readable() {
        let gateway = scratch_gateway();
        seed(&gateway).await;

        let movement = StockMovement {
            id: "m-1".to_string(),
            kind: daybreak_core::MovementKind::Transfer,
            source: "C60".to_string(),
            destination: "K12".to_string(),
            items: vec![daybreak_core::MovementItem::new("X1", 4)],
            operator_id: "E001".to_string(),
            operator_name: "Farah".to_string(),
            created_at: "2026-03-02T14:30:00Z".parse().unwrap(),
        };
        gateway.append_movement_log(&movement).await.unwrap();
        gateway.append_movement_log(&movement).await.unwrap();

        let path = gateway
            .root()
            .join(MOVEMENT_DIR)
            .join("movements_2026-03-02.log");
        let content = fs::read_to_string(path).await.unwrap();
        assert_eq!(content.matches("=== Stock Transfer ===").count(), 2);
        assert!(content.contains("From: C60 (Central 60)"));
        assert!(content.contains("To: K12 (Klang 12)"));
        assert_eq!(content.matches(LOG_SEPARATOR).count(), 2);
    }

    #[tokio::test]
    async fn test_engine_runs_against_flat_files() {
        let gateway = scratch_gateway();
        seed(&gateway).await;

        let engine = SalesEngine::bootstrap(gateway).await.unwrap();
        engine.clock_in("E001", "Farah", "C60").await.unwrap();

        let draft = engine.open_sale("C60", "Aisyah").unwrap();
        engine.add_sale_line(draft, "X1", 6).unwrap();
        engine.add_sale_line(draft, "X1", 4).unwrap();
        engine
            .commit_sale(draft, PaymentMethod::Cash, "E001")
            .await
            .unwrap();

        // The catalog file now shows the deducted quantity
        let products = engine.gateway().read_catalog().await.unwrap();
        let x1 = products.iter().find(|p| p.model_code == "X1").unwrap();
        assert_eq!(x1.stock("C60"), 0);

        let rows = engine.gateway().read_sales_rows().await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_line_is_a_hard_error() {
        let gateway = scratch_gateway();
        gateway
            .write_file(CATALOG_FILE, "Model,Price,C60\nX1,not-a-price,10\n")
            .await
            .unwrap();

        let err = gateway.read_catalog().await.unwrap_err();
        assert!(matches!(err, StoreError::MalformedRecord { line: 2, .. }));
    }
}
