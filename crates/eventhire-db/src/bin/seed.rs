//! # Seed Data Generator
//!
//! Populates the database with the development rental catalog.
//!
//! ## Usage
//! ```bash
//! cargo run -p eventhire-db --bin seed
//!
//! # Specify database path
//! cargo run -p eventhire-db --bin seed -- --db ./data/eventhire.db
//! ```
//!
//! Shipping zones are seeded by migration; this binary only loads products.

use chrono::Utc;
use std::env;
use uuid::Uuid;

use eventhire_core::Product;
use eventhire_db::{Database, DbConfig};

/// Development catalog: (title, category, price in cents, image path).
const CATALOG: &[(&str, &str, i64, &str)] = &[
    (
        "iPad 10.2 7-inch WiFi and Stand Reader",
        "Bundle",
        5975,
        "/images/ipad-stand-reader.jpg",
    ),
    (
        "iPad 10.2 7-inch Cellular and Stand Reader",
        "Bundle",
        6975,
        "/images/ipad-cellular-stand-reader.jpg",
    ),
    ("iPad 10.2 7-inch WiFi", "iPad", 3975, "/images/ipad-wifi.jpg"),
    (
        "iPad 10.2 7-inch Cellular",
        "iPad",
        4975,
        "/images/ipad-cellular.jpg",
    ),
    ("Smartphone", "Mobile", 2975, "/images/smartphone.jpg"),
    (
        "Windows Intel Desktop",
        "Desktop",
        8975,
        "/images/intel-desktop.jpg",
    ),
    (
        "Apple/Mac Laptop",
        "Laptop",
        7975,
        "/images/mac-laptop.jpg",
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./eventhire.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Eventhire Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./eventhire.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Eventhire Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("Database already has {} products", existing);
        println!("Skipping seed to avoid duplicates.");
        println!("Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Loading catalog...");

    let now = Utc::now();
    for (title, category, price_cents, image) in CATALOG {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            title: (*title).to_string(),
            description: None,
            price_cents: *price_cents,
            category: (*category).to_string(),
            image_url: Some((*image).to_string()),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        db.products().insert(&product).await?;
        println!("  + {} ({})", product.title, product.price());
    }

    let zones = db.shipping_zones().list().await?;

    println!();
    println!("Seed complete: {} products, {} shipping zones", CATALOG.len(), zones.len());

    Ok(())
}
