//! # Seed Data Generator
//!
//! Populates a database with the starter item catalog and a demo account.
//!
//! ## Usage
//! ```bash
//! cargo run -p pointlings-db --bin seed
//!
//! # Specify database path
//! cargo run -p pointlings-db --bin seed -- --db ./data/pointlings.db
//!
//! # Skip the demo user
//! cargo run -p pointlings-db --bin seed -- --no-demo
//! ```
//!
//! ## Starter Catalog
//! Hats, shoes, faces and wings (accessories, one slot each) plus slotless
//! body features, spread across the four rarities. Some are priced, some
//! level-gated, a few both.

use std::env;

use pointlings_core::{ItemCategory, ItemRarity, ItemSlot, NewItem};
use pointlings_db::{Database, DbConfig};

/// (name, asset_id, slot, rarity, price, unlock_level)
type CatalogEntry = (
    &'static str,
    &'static str,
    Option<ItemSlot>,
    ItemRarity,
    Option<i64>,
    Option<i64>,
);

const CATALOG: &[CatalogEntry] = &[
    // Hats
    ("Paper Crown", "hat_paper_crown", Some(ItemSlot::Hat), ItemRarity::Common, Some(20), None),
    ("Beanie", "hat_beanie", Some(ItemSlot::Hat), ItemRarity::Common, Some(30), None),
    ("Top Hat", "hat_top", Some(ItemSlot::Hat), ItemRarity::Rare, Some(120), None),
    ("Party Hat", "hat_party", Some(ItemSlot::Hat), ItemRarity::Rare, None, Some(3)),
    ("Wizard Hat", "hat_wizard", Some(ItemSlot::Hat), ItemRarity::Epic, Some(400), Some(8)),
    ("Golden Crown", "hat_golden_crown", Some(ItemSlot::Hat), ItemRarity::Legendary, None, Some(20)),
    // Shoes
    ("Sneakers", "shoes_sneakers", Some(ItemSlot::Shoes), ItemRarity::Common, Some(25), None),
    ("Rain Boots", "shoes_rain_boots", Some(ItemSlot::Shoes), ItemRarity::Common, Some(35), None),
    ("Roller Skates", "shoes_roller", Some(ItemSlot::Shoes), ItemRarity::Rare, Some(150), Some(4)),
    ("Rocket Boots", "shoes_rocket", Some(ItemSlot::Shoes), ItemRarity::Epic, None, Some(12)),
    // Faces
    ("Round Glasses", "face_round_glasses", Some(ItemSlot::Face), ItemRarity::Common, Some(30), None),
    ("Sunglasses", "face_sunglasses", Some(ItemSlot::Face), ItemRarity::Rare, Some(90), None),
    ("Monocle", "face_monocle", Some(ItemSlot::Face), ItemRarity::Epic, Some(300), Some(6)),
    ("Star Mask", "face_star_mask", Some(ItemSlot::Face), ItemRarity::Legendary, None, Some(25)),
    // Wings
    ("Leaf Wings", "wings_leaf", Some(ItemSlot::Wings), ItemRarity::Rare, Some(200), Some(5)),
    ("Butterfly Wings", "wings_butterfly", Some(ItemSlot::Wings), ItemRarity::Epic, Some(500), Some(10)),
    ("Phoenix Wings", "wings_phoenix", Some(ItemSlot::Wings), ItemRarity::Legendary, None, Some(30)),
    // Body features (slotless)
    ("Freckles", "feature_freckles", None, ItemRarity::Common, Some(15), None),
    ("Spots", "feature_spots", None, ItemRarity::Common, None, Some(2)),
    ("Stripes", "feature_stripes", None, ItemRarity::Rare, Some(80), None),
    ("Sparkle Aura", "feature_sparkle", None, ItemRarity::Epic, None, Some(15)),
    ("Rainbow Glow", "feature_rainbow", None, ItemRarity::Legendary, Some(1000), Some(40)),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./pointlings_dev.db");
    let mut demo = true;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--no-demo" => demo = false,
            "--help" | "-h" => {
                println!("Pointlings Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./pointlings_dev.db)");
                println!("      --no-demo      Only seed the catalog");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Pointlings Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.items().count().await?;
    if existing > 0 {
        println!("⚠ Catalog already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let items = db.items();
    let mut created = 0;
    for &(name, asset_id, slot, rarity, price_points, unlock_level) in CATALOG {
        let category = if slot.is_some() {
            ItemCategory::Accessory
        } else {
            ItemCategory::Feature
        };

        let item = NewItem {
            category,
            slot,
            asset_id: asset_id.to_string(),
            name: name.to_string(),
            rarity,
            price_points,
            unlock_level,
        };

        if let Err(e) = items.create(item).await {
            eprintln!("Failed to insert {}: {}", name, e);
            continue;
        }
        created += 1;
    }
    println!("✓ Created {} catalog items", created);

    if demo {
        let user = db.users().create_user("Demo Player", 500).await?;
        let pointling = db.pointlings().create(user.user_id, Some("Pip")).await?;
        println!(
            "✓ Demo user {} (500 points) with pointling {}",
            user.user_id, pointling.pointling_id
        );
    }

    for level in [2, 3, 5] {
        let unlocks = items.unlocks_for_level(level).await?;
        let names: Vec<_> = unlocks.iter().map(|i| i.name.as_str()).collect();
        println!("  Level {} unlocks: {:?}", level, names);
    }

    db.close().await;
    println!();
    println!("🎉 Seed complete!");
    Ok(())
}
