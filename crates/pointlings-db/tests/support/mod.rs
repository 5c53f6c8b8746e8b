//! Shared fixtures for the engine integration tests.

#![allow(dead_code)]

use pointlings_core::{ItemCategory, ItemId, ItemRarity, ItemSlot, NewItem, PointlingId, UserId};
use std::path::Path;

use pointlings_db::{Database, DbConfig};

/// Fresh migrated in-memory database.
pub async fn memory_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// File-backed database with a real connection pool, for tests that need
/// transactions to contend.
pub async fn file_db(dir: &Path) -> Database {
    Database::new(DbConfig::new(dir.join("pointlings.db")).max_connections(8))
        .await
        .expect("file database")
}

/// A user with `balance` points and one pointling.
pub async fn player(db: &Database, balance: i64) -> (UserId, PointlingId) {
    let user = db
        .users()
        .create_user("Player", balance)
        .await
        .expect("create user");
    let pointling = db
        .pointlings()
        .create(user.user_id, Some("Pip"))
        .await
        .expect("create pointling");
    (user.user_id, pointling.pointling_id)
}

pub async fn item(
    db: &Database,
    name: &str,
    slot: Option<ItemSlot>,
    price_points: Option<i64>,
    unlock_level: Option<i64>,
) -> ItemId {
    let category = if slot.is_some() {
        ItemCategory::Accessory
    } else {
        ItemCategory::Feature
    };
    db.items()
        .create(NewItem {
            category,
            slot,
            asset_id: name.to_lowercase().replace(' ', "_"),
            name: name.to_string(),
            rarity: ItemRarity::Common,
            price_points,
            unlock_level,
        })
        .await
        .expect("create item")
        .item_id
}

/// Current balance, read straight from the pool.
pub async fn balance(db: &Database, user_id: UserId) -> i64 {
    db.users()
        .get_by_id(user_id)
        .await
        .expect("query user")
        .expect("user exists")
        .point_balance
}
