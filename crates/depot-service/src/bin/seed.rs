//! # Seed Data Generator
//!
//! Populates a Depot database with demo categories, products and one
//! account per role, then prints the inventory summary as JSON.
//!
//! ## Usage
//! ```bash
//! # Seed ./depot.db (or $DEPOT_DATABASE_PATH)
//! cargo run -p depot-service --bin seed
//!
//! # Specify database path
//! cargo run -p depot-service --bin seed -- --db ./data/depot.db
//!
//! # More logging
//! RUST_LOG=depot_db=debug cargo run -p depot-service --bin seed
//! ```
//!
//! ## Generated Data
//! - Five categories, the last one inactive
//! - Products with SKU `{CATEGORY}-{INDEX}`, stock spread across all three
//!   status buckets
//! - Users `manager`, `picker`, `receiver`, `controller`, password
//!   `Depot2024` for all of them

use std::env;
use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use depot_core::UserRole;
use depot_service::{AppConfig, Depot, NewProduct, NewUser, ServiceError};

/// Category code, name, description and product names.
const CATEGORIES: &[(&str, &str, &str, &[&str])] = &[
    (
        "ELC",
        "Electronics",
        "Devices and accessories",
        &[
            "Laptop",
            "Monitor",
            "Keyboard",
            "Mouse",
            "USB Hub",
            "Webcam",
            "Headset",
            "Docking Station",
        ],
    ),
    (
        "TLS",
        "Tools",
        "Hand and power tools",
        &[
            "Hammer",
            "Screwdriver Set",
            "Cordless Drill",
            "Tape Measure",
            "Utility Knife",
            "Wrench Set",
        ],
    ),
    (
        "PKG",
        "Packaging",
        "Boxes, tape and fillers",
        &[
            "Small Box",
            "Medium Box",
            "Large Box",
            "Packing Tape",
            "Bubble Wrap",
            "Stretch Film",
            "Void Fill",
        ],
    ),
    (
        "SAF",
        "Safety",
        "Protective equipment",
        &[
            "Safety Gloves",
            "Hard Hat",
            "Safety Glasses",
            "High Vis Vest",
            "Ear Plugs",
        ],
    ),
    (
        "ARC",
        "Archive",
        "Discontinued lines",
        &[],
    ),
];

const DEMO_PASSWORD: &str = "Depot2024";

const USERS: &[(&str, &str, &str, UserRole)] = &[
    ("manager", "manager@depot.io", "Maria Ruiz", UserRole::Manager),
    ("picker", "picker@depot.io", "Ana Lopez", UserRole::Picker),
    ("receiver", "receiver@depot.io", "Luis Perez", UserRole::Receiver),
    ("controller", "controller@depot.io", "Sofia Diaz", UserRole::Controller),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = AppConfig::load()?;

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Depot Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $DEPOT_DATABASE_PATH or ./depot.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(argument = other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(path = %config.database_path.display(), "Seeding database");
    let depot = Depot::open(&config).await?;

    let existing = depot.products.count().await?;
    if existing > 0 {
        warn!(existing, "Database already has products, skipping seed");
        println!("{}", serde_json::to_string_pretty(&depot.dashboard.summary().await?)?);
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut generated = 0;

    for (code, name, description, products) in CATEGORIES {
        let category = depot.categories.create(name, description).await?;

        for (index, product_name) in products.iter().enumerate() {
            match depot
                .products
                .create(demo_product(code, product_name, index, category.id))
                .await
            {
                Ok(_) => generated += 1,
                Err(e) => warn!(category = name, product = product_name, error = %e, "Skipped product"),
            }
        }

        if products.is_empty() {
            depot.categories.toggle_active(category.id).await?;
        }
    }

    for (username, email, full_name, role) in USERS {
        let created = depot
            .users
            .create(NewUser {
                username: username.to_string(),
                password: DEMO_PASSWORD.to_string(),
                email: email.to_string(),
                full_name: full_name.to_string(),
                role: *role,
            })
            .await;

        match created {
            Ok(user) => info!(username = %user.username, role = %user.role.formatted(), "Seeded user"),
            Err(ServiceError::Validation(e)) => warn!(username, error = %e, "Skipped user"),
            Err(e) => return Err(e.into()),
        }
    }

    info!(products = generated, elapsed = ?start.elapsed(), "Seed complete");

    let summary = depot.dashboard.summary().await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

/// Builds one demo product. Stock cycles through out-of-stock, low and
/// healthy levels so every status bucket is populated.
fn demo_product(code: &str, name: &str, index: usize, category_id: i64) -> NewProduct {
    let seed = index as i64;
    let min_stock = 5 + (seed * 3) % 10;
    let stock = match index % 4 {
        0 => 0,
        1 => min_stock / 2 + 1,
        _ => min_stock + 10 + seed * 7,
    };

    NewProduct {
        sku: format!("{code}-{:03}", index + 1),
        name: name.to_string(),
        description: format!("{name} (demo)"),
        price: 1.99 + ((seed * 17) % 800) as f64 / 20.0,
        stock,
        min_stock,
        location: format!("{}-{:02}", &code[..1], index + 1),
        category_id,
    }
}
