//! # Seed Data Generator
//!
//! Populates a Daybreak POS store with demo outlets and catalog data.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p daybreak-db --bin seed
//!
//! # Specify database path
//! cargo run -p daybreak-db --bin seed -- --db ./data/daybreak.db
//!
//! # Also export the flat-file interchange set
//! cargo run -p daybreak-db --bin seed -- --data ./data
//! ```

use std::env;

use tracing::info;
use tracing_subscriber::EnvFilter;

use daybreak_core::{Outlet, Product};
use daybreak_db::{FlatFileGateway, Store, StoreConfig};

/// Demo outlets: (code, name)
const OUTLETS: &[(&str, &str)] = &[
    ("C60", "Central 60"),
    ("K12", "Klang 12"),
    ("P03", "Penang 03"),
];

/// Demo catalog: (model code, display name, price cents, per-outlet stock)
const MODELS: &[(&str, &str, i64, &[(&str, i64)])] = &[
    ("X1", "Daybreak X1", 10000, &[("C60", 10), ("K12", 6)]),
    ("X1-PRO", "Daybreak X1 Pro", 15900, &[("C60", 4), ("P03", 2)]),
    ("Z9", "Daybreak Z9", 2500, &[("C60", 25), ("K12", 12), ("P03", 8)]),
    ("Z9-MINI", "Daybreak Z9 Mini", 1890, &[("K12", 30)]),
    ("A400", "Aurora 400", 45000, &[("C60", 2)]),
    ("A400-GOLD", "Aurora 400 Gold", 69900, &[("C60", 1)]),
    ("S7", "Solstice 7", 7990, &[("C60", 14), ("K12", 9), ("P03", 11)]),
    ("S7-BAND", "Solstice 7 Band", 990, &[("C60", 40), ("K12", 35)]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./daybreak_dev.db");
    let mut data_dir: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--data" => {
                if i + 1 < args.len() {
                    data_dir = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Daybreak POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./daybreak_dev.db)");
                println!("      --data <DIR>   Also export the flat-file interchange set");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Daybreak POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let store = Store::new(StoreConfig::new(&db_path)).await?;
    println!("✓ Connected to store");
    println!("✓ Migrations applied");

    let catalog = store.catalog();

    let existing = catalog.count_products().await?;
    if existing > 0 {
        println!("⚠ Store already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding outlets and catalog...");

    let outlets: Vec<Outlet> = OUTLETS
        .iter()
        .map(|(code, name)| Outlet::new(*code, *name))
        .collect();
    for outlet in &outlets {
        catalog.upsert_outlet(outlet).await?;
    }

    let mut products = Vec::with_capacity(MODELS.len());
    for (code, name, price_cents, stock) in MODELS {
        let mut product = Product::new(*code, *name, *price_cents);
        for (outlet, quantity) in *stock {
            product.set_stock(*outlet, *quantity);
        }
        catalog.upsert_product(&product).await?;
        products.push(product);
    }

    info!(
        outlets = outlets.len(),
        models = products.len(),
        "Seed data written"
    );
    println!("✓ {} outlets, {} models", outlets.len(), products.len());

    if let Some(dir) = data_dir {
        let flat = FlatFileGateway::new(&dir);
        flat.write_outlets(&outlets).await?;
        flat.write_catalog(&products).await?;
        println!("✓ Interchange files exported to {}", dir);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
