//! # Development Database Bootstrapper
//!
//! Creates (or opens) a Bloom Shop database file, runs migrations, and seeds
//! the starter catalog plus the default admin account.
//!
//! ## Usage
//! ```bash
//! # Bootstrap ./bloom_dev.db (default)
//! cargo run -p bloom-db --bin seed
//!
//! # Specify database path
//! cargo run -p bloom-db --bin seed -- --db ./data/bloom.db
//!
//! # Wipe shopping data and reseed the catalog
//! cargo run -p bloom-db --bin seed -- --db ./data/bloom.db --reset
//! ```
//!
//! Seeding is idempotent: an already-populated catalog and an existing admin
//! account are left untouched on repeat runs.

use std::env;

use bloom_core::DEFAULT_ADMIN_EMAIL;
use bloom_db::{migrations, Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug surfaces the store's tracing output
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./bloom_dev.db");
    let mut reset = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--reset" | "-r" => {
                reset = true;
            }
            "--help" | "-h" => {
                println!("Bloom Shop Database Bootstrapper");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./bloom_dev.db)");
                println!("  -r, --reset        Wipe shopping data and reseed the catalog");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌸 Bloom Shop Database Bootstrapper");
    println!("===================================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::connect(config).await?;

    println!("✓ Connected to database");

    db.initialize().await?;

    let (total, applied) = migrations::migration_status(db.pool()).await?;
    println!("✓ Migrations applied ({}/{})", applied, total);

    if reset {
        db.clear_all_data().await?;
        println!("✓ Shopping data wiped, catalog reseeded");
    }

    let products = db.products().count().await?;
    let users = db.users().get_all().await?.len();
    let orders = db.orders().count().await?;

    println!();
    println!("Catalog:  {} products", products);
    println!("Accounts: {} users (admin: {})", users, DEFAULT_ADMIN_EMAIL);
    println!("Orders:   {}", orders);
    println!();
    println!("✓ Bootstrap complete!");

    db.close().await;

    Ok(())
}
