//! # Inventory Engine
//!
//! Equip toggling with the one-item-per-slot rule.

use tracing::info;

use crate::error::{CoreError, CoreResult};
use crate::store::{Store, StoreTx};
use crate::types::{ItemId, PointlingId, PointlingItem};

/// Equip/unequip workflow.
#[derive(Debug, Clone)]
pub struct InventoryEngine<S> {
    store: S,
}

impl<S: Store> InventoryEngine<S> {
    pub fn new(store: S) -> Self {
        InventoryEngine { store }
    }

    /// Sets the equipped flag of an owned item.
    ///
    /// Equipping first unequips whatever else the pointling wears in the same
    /// slot. Slotless items are toggled on their own.
    pub async fn toggle_equipped(
        &self,
        pointling_id: PointlingId,
        item_id: ItemId,
        equip: bool,
    ) -> CoreResult<PointlingItem> {
        let mut tx = self.store.begin().await?;

        let displaced = if equip {
            tx.unequip_slot_siblings(pointling_id, item_id).await?
        } else {
            0
        };

        let edge = tx
            .set_equipped(pointling_id, item_id, equip)
            .await?
            .ok_or(CoreError::NotOwned {
                pointling_id,
                item_id,
            })?;

        tx.commit().await?;
        info!(pointling_id, item_id, equip, displaced, "Equip state changed");

        Ok(edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::MemoryStore;
    use crate::error::ErrorKind;
    use crate::types::{ItemCategory, ItemRarity, ItemSlot};

    fn hat(store: &MemoryStore) -> ItemId {
        store.add_item(
            ItemCategory::Accessory,
            Some(ItemSlot::Hat),
            ItemRarity::Common,
            Some(10),
            None,
        )
    }

    #[tokio::test]
    async fn test_equip_displaces_same_slot() {
        let store = MemoryStore::new();
        let user = store.add_user(0);
        let pointling = store.add_pointling(user);
        let (a, b, c) = (hat(&store), hat(&store), hat(&store));
        for item in [a, b, c] {
            store.give(pointling, item);
        }
        let engine = InventoryEngine::new(store.clone());

        for item in [a, b, c, b, a] {
            engine.toggle_equipped(pointling, item, true).await.unwrap();
            assert_eq!(store.equipped(pointling), vec![item]);
        }
    }

    #[tokio::test]
    async fn test_other_slots_and_slotless_items_unaffected() {
        let store = MemoryStore::new();
        let user = store.add_user(0);
        let pointling = store.add_pointling(user);
        let top = hat(&store);
        let boots = store.add_item(
            ItemCategory::Accessory,
            Some(ItemSlot::Shoes),
            ItemRarity::Rare,
            None,
            None,
        );
        let spots = store.add_item(ItemCategory::Feature, None, ItemRarity::Common, None, None);
        let stripes = store.add_item(ItemCategory::Feature, None, ItemRarity::Common, None, None);
        for item in [top, boots, spots, stripes] {
            store.give(pointling, item);
            InventoryEngine::new(store.clone())
                .toggle_equipped(pointling, item, true)
                .await
                .unwrap();
        }

        let mut equipped = store.equipped(pointling);
        equipped.sort();
        assert_eq!(equipped, vec![top, boots, spots, stripes]);
    }

    #[tokio::test]
    async fn test_unequip_and_not_owned() {
        let store = MemoryStore::new();
        let user = store.add_user(0);
        let pointling = store.add_pointling(user);
        let owned = hat(&store);
        let unowned = hat(&store);
        store.give(pointling, owned);
        let engine = InventoryEngine::new(store.clone());

        engine.toggle_equipped(pointling, owned, true).await.unwrap();
        let edge = engine.toggle_equipped(pointling, owned, false).await.unwrap();
        assert!(!edge.equipped);
        assert!(store.equipped(pointling).is_empty());

        // failed equip must not leave the sibling unequipped
        engine.toggle_equipped(pointling, owned, true).await.unwrap();
        let err = engine
            .toggle_equipped(pointling, unowned, true)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotOwned);
        assert_eq!(store.equipped(pointling), vec![owned]);
    }
}
