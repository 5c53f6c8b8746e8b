//! Contending transactions on a file-backed pool.
//!
//! Every engine transaction opens with a write, so SQLite serializes them on
//! the write lock and each one sees the state its predecessor committed.

mod support;

use pointlings_core::{
    CommerceEngine, CoreError, InventoryEngine, ItemSlot, XpEngine, XpSource,
};

use support::{balance, file_db, item, player};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_purchases_never_overdraw() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_db(dir.path()).await;
    let (user, pointling) = player(&db, 100).await;

    let mut items = Vec::new();
    for name in ["Cap", "Boots", "Shades", "Wings", "Crown"] {
        items.push(item(&db, name, None, Some(60), None).await);
    }

    let engine = CommerceEngine::new(db.store());
    let handles: Vec<_> = items
        .into_iter()
        .map(|item_id| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.spend_points(user, item_id, pointling).await })
        })
        .collect();

    let mut bought = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(purchase) => {
                bought += 1;
                assert_eq!(purchase.new_balance, 40);
            }
            Err(err) => assert!(matches!(err, CoreError::InsufficientBalance { .. }), "{err}"),
        }
    }

    assert_eq!(bought, 1);
    assert_eq!(balance(&db, user).await, 40);
    assert_eq!(db.point_spends().total_spent_by_user(user).await.unwrap(), 60);
    assert_eq!(
        db.inventory().list_for_pointling(pointling, None).await.unwrap().len(),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_grants_respect_daily_cap() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_db(dir.path()).await;
    let (_, pointling) = player(&db, 0).await;

    let engine = XpEngine::new(db.store());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.grant_xp(pointling, XpSource::Receipt, 10).await })
        })
        .collect();

    let mut granted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(grant) => granted += grant.xp_gained,
            Err(err) => assert!(matches!(err, CoreError::DailyLimitExceeded { .. }), "{err}"),
        }
    }

    assert_eq!(granted, XpSource::Receipt.daily_cap());
    let events = db.xp_events().list_for_pointling(pointling, 100).await.unwrap();
    assert_eq!(events.len(), 5);

    // five grants, one level each
    let stored = db.pointlings().get_by_id(pointling).await.unwrap().unwrap();
    assert_eq!(stored.level, 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_equips_leave_one_item_per_slot() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_db(dir.path()).await;
    let (_, pointling) = player(&db, 0).await;

    let commerce = CommerceEngine::new(db.store());
    let mut hats = Vec::new();
    for name in ["Cap", "Beanie", "Crown", "Fedora", "Bowler", "Helmet"] {
        let hat = item(&db, name, Some(ItemSlot::Hat), None, None).await;
        commerce.acquire_item(pointling, hat).await.unwrap();
        hats.push(hat);
    }

    let engine = InventoryEngine::new(db.store());
    let handles: Vec<_> = hats
        .iter()
        .map(|&hat| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.toggle_equipped(pointling, hat, true).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let worn = db
        .inventory()
        .list_for_pointling(pointling, Some(true))
        .await
        .unwrap();
    assert_eq!(worn.len(), 1);
    assert!(hats.contains(&worn[0].item_id));
}
